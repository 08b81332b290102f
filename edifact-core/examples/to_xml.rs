//! Convert an interchange to XML.
//!
//! Usage: cargo run --example to_xml -- <file.edi> [encoding]
//!
//! Reads standard input when no file is given. Set `RUST_LOG=debug` to see
//! directory dispatch.

use std::io::{self, Read, Write};

use edifact_core::{EdifactParser, Source, XmlSink};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr).without_time())
        .init();

    let mut args = std::env::args().skip(1);
    let path = args.next();
    let encoding = args.next();

    let mut stdin = Vec::new();
    let source = match (path, encoding) {
        (Some(path), None) => Source::path(path),
        (Some(path), Some(encoding)) => Source::Path {
            path: path.into(),
            encoding: Some(encoding),
        },
        (None, _) => {
            io::stdin().read_to_end(&mut stdin)?;
            Source::from(&stdin[..])
        }
    };

    let mut sink = XmlSink::indented(io::stdout().lock(), 2);
    EdifactParser::new().parse(source, &mut sink)?;
    writeln!(sink.into_inner())?;
    Ok(())
}
