use crate::changelog::render::ChangelogSection;
use crate::config::{ChangelogConfig, MissingMarker};
use crate::error::{Result, SemrelError};

/// Document used when there is no changelog yet
fn canonical_document(config: &ChangelogConfig) -> String {
    format!("{}\n\n{}\n", config.header, config.placeholder)
}

/// Splice a release section into a changelog document
///
/// `document` is `None` when the file does not exist. The section goes right
/// after the placeholder marker, followed by a blank line and then the rest
/// of the old document, byte for byte.
pub fn splice(
    document: Option<&str>,
    section: &ChangelogSection,
    config: &ChangelogConfig,
) -> Result<String> {
    splice_markdown(document, &section.to_markdown(), config)
}

/// [`splice`] for already rendered markdown
pub fn splice_markdown(document: Option<&str>, markdown: &str, config: &ChangelogConfig) -> Result<String> {
    let marker = config.placeholder.as_str();

    let document = match document {
        Some(text) if !text.trim().is_empty() => text.to_string(),
        _ => canonical_document(config),
    };

    let document = if document.contains(marker) {
        document
    } else {
        with_marker(&document, config)?
    };

    // Checked above: the marker is present from here on
    let Some(position) = document.find(marker) else {
        return Err(SemrelError::ChangelogMarkerMissing {
            path: config.path.clone(),
        });
    };
    let (before, after) = document.split_at(position + marker.len());

    Ok(format!("{}\n\n{}{}", before, markdown, after))
}

/// Place the marker under a recognised header, or refuse
fn with_marker(document: &str, config: &ChangelogConfig) -> Result<String> {
    let refuse = || SemrelError::ChangelogMarkerMissing {
        path: config.path.clone(),
    };

    let trimmed = document.trim_start();
    let header_line = trimmed.lines().next().unwrap_or_default();
    if header_line.trim_end() != config.header.trim() {
        log::error!(
            "{} has neither '{}' nor a '{}' header",
            config.path.display(),
            config.placeholder,
            config.header
        );
        return Err(refuse());
    }

    if config.missing_marker == MissingMarker::Refuse {
        log::error!(
            "{} is missing '{}' and inserting it is disabled",
            config.path.display(),
            config.placeholder
        );
        return Err(refuse());
    }

    log::warn!(
        "Inserting '{}' under the header of {}",
        config.placeholder,
        config.path.display()
    );

    let rest = trimmed[header_line.len()..].trim_start_matches(['\r', '\n']);
    if rest.is_empty() {
        Ok(canonical_document(config))
    } else {
        Ok(format!(
            "{}\n\n{}\n\n{}",
            header_line.trim_end(),
            config.placeholder,
            rest
        ))
    }
}
