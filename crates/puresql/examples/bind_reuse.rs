//! Author a template once, bind it twice with different values.

use puresql::{Bindings, Partial, Template};

fn main() -> anyhow::Result<()> {
    let template = Template::parse(
        "SELECT id, total FROM :!table WHERE status = :status AND region IN (:regions*) AND :*recent :days*;",
    )?;

    // One static pass up front; the skeleton is reusable.
    let skeleton = template.prepare()?;
    println!("skeleton: {}", skeleton.context().source());

    let mut bindings = Bindings::new();
    bindings
        .set("!table", "orders")
        .set("status", "open")
        .set("regions*", vec!["eu", "us"])
        .set("days", 30)
        .set_hook("*recent", |_| {
            Partial::new("created_at > now() - make_interval(days => :n)")
        });

    let rendered = skeleton.map_template(&bindings)?;
    println!("query: {}", rendered.query);
    println!("args:  {:?}", rendered.args);

    let mut narrower = Bindings::new();
    narrower
        .set("!table", "orders")
        .set("status", "closed")
        .set("regions*", vec!["apac"])
        .set("days", 7)
        .set_hook("*recent", |_| {
            Partial::new("created_at > now() - make_interval(days => :n)")
        });

    let rendered = skeleton.map_template(&narrower)?;
    println!("query: {}", rendered.query);
    println!("args:  {:?}", rendered.args);

    Ok(())
}
