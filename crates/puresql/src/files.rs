use crate::context::{Context, ResolveOptions};
use crate::errors::Error;
use crate::split::split;
use crate::template::Template;
use puresql_parser::tokenize;
use std::collections::HashMap;
use std::path::Path;
use walkdir::WalkDir;

/// Load every template file under `dir` carrying the given extension.
///
/// Each file is tokenized and split at its `-- name:` markers; a file's
/// unnamed leading template is keyed by the file stem. Entries from later
/// files win on name collisions.
pub fn load_dir(
    dir: &Path,
    extension: &str,
    options: ResolveOptions,
) -> Result<HashMap<String, Template>, Error> {
    let mut templates = HashMap::new();

    for entry in WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some(extension) {
            continue;
        }

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();

        let content = std::fs::read_to_string(path).map_err(|source| Error::TemplateRead {
            path: path.to_path_buf(),
            source,
        })?;

        for (name, tokens) in split(tokenize(&content)?) {
            let key = if name.is_empty() { stem.clone() } else { name };
            templates.insert(
                key,
                Template::from_context(Context::with_options(tokens, options.clone())),
            );
        }
    }

    Ok(templates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Bindings;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_load_dir_names_default_template_by_file_stem() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("users.sql"),
            "SELECT * FROM users WHERE id = :id;\n-- name: by_email\nSELECT * FROM users WHERE email = :email;",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("orders.sql"),
            "SELECT * FROM orders WHERE status = :status;",
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a template").unwrap();

        let templates = load_dir(dir.path(), "sql", ResolveOptions::default()).unwrap();

        let mut names: Vec<&str> = templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["by_email", "orders", "users"]);

        let mut bindings = Bindings::new();
        bindings.set("id", 3);
        let rendered = templates["users"].map_template(&bindings).unwrap();
        assert_eq!(rendered.query, "SELECT * FROM users WHERE id = $1;");
        assert_eq!(rendered.args, vec![json!(3)]);
    }

    #[test]
    fn test_load_dir_later_file_wins_on_name_collision() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("a.sql"),
            "-- name: shared\nSELECT 'from a' WHERE x = :x;",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("b.sql"),
            "-- name: shared\nSELECT 'from b' WHERE x = :x;",
        )
        .unwrap();

        let templates = load_dir(dir.path(), "sql", ResolveOptions::default()).unwrap();

        // Files load in name order, so b.sql overwrites a.sql's entry.
        let mut bindings = Bindings::new();
        bindings.set("x", 1);
        let rendered = templates["shared"].map_template(&bindings).unwrap();
        assert_eq!(rendered.query, "SELECT 'from b' WHERE x = $1;");
    }

    #[test]
    fn test_load_dir_missing_path_yields_no_templates() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nowhere");
        let templates = load_dir(&missing, "sql", ResolveOptions::default()).unwrap();
        assert!(templates.is_empty());
    }
}
