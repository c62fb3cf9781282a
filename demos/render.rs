//! Rendering a small forum post to HTML and plain text.
//!
//! Run with: cargo run --example render

use bbmark::{parse, TagRegistry};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let registry = TagRegistry::with_defaults();

    let post = "[h2]Release notes[/h2]\n\
                [quote=maintainer]We fixed [b]a lot[/b] of bugs.\n\n\
                Thanks to everyone who reported them![/quote]\n\
                [list]\n[*]faster [i]tokenizer[/i]\n[*][uppercase]fewer[/uppercase] panics\n[/list]\n\
                [hr]\n\
                [code]let x = [1, 2];[/code]\n\
                Unknown [blink]tags[/blink] stay visible.";

    let tree = parse(post, &registry)?;

    println!("HTML:\n{}\n", tree.to_html());
    println!("Text:\n{}", tree.to_text());

    Ok(())
}
