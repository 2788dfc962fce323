use std::io::{BufRead, stdin};
use tagfmt::{Config, Context, Loader, include_template};
use tracing_subscriber::EnvFilter;

fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let inlined = include_template!("/templates/header.tmpl").map_err(|e| e.into_io())?;
    let loader = Loader::new(Config::from_env().with_templ_dir("example/templates"));

    loop {
        let ctx = Context::new().with("name", "Romaric").with("mood", "curious");

        let result = loader.render("header.tmpl", &ctx).map_err(|e| e.into_io())?;
        let bored = inlined.render(&ctx.with("mood", "bored")).map_err(|e| e.into_io())?;

        println!("{result}\n{bored}");
        println!("[Press ENTER to re render]");

        let mut buf = String::new();
        { stdin().lock().read_line(&mut buf)?; }

        if buf == "q\n" {
            break Ok(())
        }
    }
}
