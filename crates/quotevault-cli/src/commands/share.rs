use std::io::{self, Write};
use std::path::{Path, PathBuf};

use quotevault_core::models::CardStyle;
use quotevault_core::share::{render_card_json, share_text, ShareCard, ShareFormat};

use super::common::{parse_quote_id, Runtime};
use crate::cli::ShareFormatArg;
use crate::error::CliError;

impl From<ShareFormatArg> for ShareFormat {
    fn from(value: ShareFormatArg) -> Self {
        match value {
            ShareFormatArg::Text => Self::Text,
            ShareFormatArg::Card => Self::Card,
        }
    }
}

pub async fn run_share(
    runtime: &Runtime,
    id: &str,
    format: ShareFormatArg,
    style: &str,
    output_path: Option<&Path>,
) -> Result<(), CliError> {
    let quote_id = parse_quote_id(id)?;
    let style = style
        .parse::<CardStyle>()
        .map_err(CliError::InvalidArgument)?;
    let quote = runtime.backend().get_quote(quote_id).await?;

    let format = ShareFormat::from(format);
    let rendered = match format {
        ShareFormat::Text => share_text(&quote),
        ShareFormat::Card => render_card_json(&ShareCard::new(&quote, style))?,
    };

    if let Some(path) = output_path {
        let path = output_file(path, format);
        std::fs::write(&path, &rendered)?;
        println!("{}", path.display());
    } else {
        let mut stdout = io::stdout();
        stdout.write_all(rendered.as_bytes())?;
        stdout.write_all(b"\n")?;
    }
    Ok(())
}

/// Append the format's extension when `path` has none.
pub fn output_file(path: &Path, format: ShareFormat) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(format.extension())
    }
}
