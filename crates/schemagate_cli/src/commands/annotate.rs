use anyhow::Context;
use schemagate_core::{annotate_file, AnnotateOptions};
use std::path::Path;

pub fn annotate(file: &Path, output: Option<&Path>, markers: Vec<String>) -> anyhow::Result<()> {
    let mut options = AnnotateOptions::default();
    if !markers.is_empty() {
        options.ignored_default_markers = markers;
    }

    let annotated = annotate_file(file, &options)?;

    match output {
        Some(path) => std::fs::write(path, annotated)
            .with_context(|| format!("failed to write `{}`", path.display()))?,
        None => println!("{annotated}"),
    }
    Ok(())
}
