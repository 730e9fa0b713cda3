//! Sequential dispatch of harvested files to text and image consumers.

use anyhow::{Context, Result};
use log::{debug, trace};

use crate::engine::classify::classify_parts;
use crate::{Classification, DispatchSummary, FileMeta, HarvestedFile};

use super::object_url::{ObjectUrls, Revoker};

/// Image consumer type to name when no image consumer is supplied: `None::<NoImages>`.
pub type NoImages = fn(&str, String, Revoker) -> Result<()>;

/// Classify each file in harvest order and hand it to a consumer, one file fully handled before the next.
///
/// - `Image`: with an image consumer, register the bytes in `urls` and call `on_image(name, url, revoker)`.
///   The consumer owns the URL from then on and must call [`Revoker::revoke`] when done.
///   Without one, the file is skipped.
/// - `Text`: read the bytes, decode as UTF-8 (invalid sequences replaced) and call `on_text(text, meta)`.
/// - `Ignored`: skipped.
///
/// Consumer errors and byte-read failures abort the remaining dispatch.
pub async fn dispatch<T, I>(
    files: impl IntoIterator<Item = HarvestedFile>,
    mut on_text: T,
    mut on_image: Option<I>,
    urls: &ObjectUrls,
) -> Result<DispatchSummary>
where
    T: FnMut(String, &FileMeta) -> Result<()>,
    I: FnMut(&str, String, Revoker) -> Result<()>,
{
    let mut summary = DispatchSummary::default();
    for file in files {
        match classify_parts(&file.name, &file.content_kind) {
            Classification::Image => {
                let Some(on_image) = on_image.as_mut() else {
                    trace!("no image consumer; skipping {}", file.full_path);
                    summary.ignored += 1;
                    continue;
                };
                let (url, revoker) = urls.create(file.source.clone());
                on_image(&file.name, url, revoker)
                    .with_context(|| format!("image consumer failed on {}", file.full_path))?;
                summary.images += 1;
            }
            Classification::Text => {
                let bytes = file
                    .source
                    .bytes()
                    .await
                    .with_context(|| format!("read {}", file.full_path))?;
                let text = String::from_utf8_lossy(&bytes).into_owned();
                on_text(text, &file.meta())
                    .with_context(|| format!("text consumer failed on {}", file.full_path))?;
                summary.text += 1;
            }
            Classification::Ignored => {
                trace!("ignoring {} ({:?})", file.full_path, file.content_kind);
                summary.ignored += 1;
            }
        }
    }
    debug!(
        "dispatched {} text, {} images, {} ignored",
        summary.text, summary.images, summary.ignored
    );
    Ok(summary)
}
