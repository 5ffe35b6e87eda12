use minijinja::{Environment, context};
use oats_core::fragment::indent;
use oats_core::output::{Output, Section};

/// Wrap every section of `output` in an `export interface` declaration.
///
/// Sections keep their output order. The Express type import is added only
/// when the `express` section has content.
pub fn render_module(output: &Output, title: Option<&str>) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.add_template("schema.ts.j2", include_str!("../templates/schema.ts.j2"))?;
    let tmpl = env.get_template("schema.ts.j2")?;

    let sections: Vec<minijinja::Value> = output
        .iter()
        .map(|(section, body)| {
            context! {
                name => section.as_str(),
                body => indent(body, 2),
            }
        })
        .collect();
    let uses_express = output
        .get(Section::Express)
        .is_some_and(|body| !body.is_empty());

    tmpl.render(context! {
        title => title.map(|t| t.replace("*/", "*\\/")),
        uses_express => uses_express,
        sections => sections,
    })
}
