//! Customizing the tag syntax with ParseOptions.
//!
//! Run with: cargo run --example custom_options

use bbmark::{parse_with_options, tokenize_with_options, ParseOptions, TagRegistry};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let registry = TagRegistry::with_defaults();

    // Default syntax
    println!("Default ([ ]):");
    let tree = parse_with_options("[b]bold[/b] [hr/]", &registry, &ParseOptions::default())?;
    println!("{}\n", tree.to_html());

    // Curly braces, no self-closing shortcut
    println!("Curly braces, self-closing disabled:");
    let options = ParseOptions::new()
        .with_delimiters('{', '}')
        .with_self_closing(false);
    let tree = parse_with_options("{b}bold{/b} {hr/} [b]not a tag[/b]", &registry, &options)?;
    println!("{}\n", tree.to_html());

    // Paragraphs at the document root
    println!("Root paragraphs:");
    let options = ParseOptions::new().with_root_paragraphs(true);
    let tree = parse_with_options("first line\nsame paragraph\n\nsecond paragraph", &registry, &options)?;
    println!("{}", tree.to_html());

    // Token stream as JSON-friendly structs
    println!("Tokens:");
    for token in tokenize_with_options("[url=http://example.com]x[/url]", &ParseOptions::default())? {
        println!("  {:?} {:?}", token.kind, token.raw_text);
    }

    Ok(())
}
