//! Server-rendered HTML for the single-page UI.

use super::state::{Outcome, Session, ViewState};
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write as _;

const TITLE: &str = "Alt Text Generator";

const STYLE: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 760px; margin: 40px auto; padding: 0 20px; color: #222; }
h1 { margin-bottom: 24px; }
figure { margin: 24px 0; }
figure img { max-width: 100%; border-radius: 8px; box-shadow: 0 4px 15px rgba(0,0,0,0.1); }
figcaption { color: #666; font-size: 0.9em; margin-top: 6px; }
button { background: #ff4b4b; color: white; border: 0; border-radius: 6px; padding: 10px 18px; font-size: 1em; cursor: pointer; }
button:disabled { background: #ccc; cursor: wait; }
.spinner { display: flex; align-items: center; gap: 12px; color: #555; margin: 16px 0; }
.spinner::before { content: ""; width: 20px; height: 20px; border: 3px solid #eee; border-top-color: #ff4b4b; border-radius: 50%; animation: spin 1s linear infinite; }
.hidden { display: none; }
.success { background: #e8f7ee; color: #1b6e3b; padding: 12px 16px; border-radius: 6px; margin: 16px 0; }
.error { background: #fdecea; color: #a12622; padding: 12px 16px; border-radius: 6px; margin: 16px 0; }
@keyframes spin { to { transform: rotate(360deg); } }
"#;

const SCRIPT: &str = r#"
document.getElementById('image-input').addEventListener('change', function () {
  if (this.files.length > 0) { this.form.submit(); }
});
var generate = document.getElementById('generate-form');
if (generate) {
  generate.addEventListener('submit', function () {
    document.getElementById('generate-button').disabled = true;
    document.getElementById('progress').classList.remove('hidden');
  });
}
"#;

const PROGRESS_TEXT: &str = "Please wait while we generate the alt text...";

/// Render the page for the current session, with an optional notice banner.
pub fn render(session: &Session, notice: Option<&str>) -> String {
    let processing = session.is_processing();
    let mut body = String::new();

    let _ = write!(body, "<h1>{}</h1>", TITLE);

    if let Some(notice) = notice {
        let _ = write!(
            body,
            r#"<div class="error" id="notice">{}</div>"#,
            encode_text(notice)
        );
    }

    let _ = write!(
        body,
        r#"<form action="/image" method="post" enctype="multipart/form-data">
<label for="image-input">Upload an image</label>
<input type="file" id="image-input" name="image" accept=".png,.jpg,.jpeg,image/png,image/jpeg"{disabled}>
<noscript><button type="submit"{disabled}>Upload</button></noscript>
</form>"#,
        disabled = if processing { " disabled" } else { "" }
    );

    if let Some(image) = session.image() {
        let caption = image.file_name().unwrap_or("Uploaded Image");
        let _ = write!(
            body,
            r#"<figure><img src="/image?rev={}" alt="{}"><figcaption>Uploaded Image</figcaption></figure>"#,
            session.revision(),
            encode_double_quoted_attribute(caption)
        );

        let _ = write!(
            body,
            r#"<form id="generate-form" action="/generate" method="post">
<button type="submit" id="generate-button"{}>Generate Alt Text</button>
</form>
<div id="progress" class="spinner{}">{}</div>"#,
            if processing { " disabled" } else { "" },
            if processing { "" } else { " hidden" },
            PROGRESS_TEXT
        );
    }

    if let ViewState::ImageLoaded {
        outcome: Some(outcome),
        ..
    } = session.state()
    {
        match outcome {
            Outcome::Success(description) => {
                let _ = write!(
                    body,
                    r#"<div class="success" id="status">Alt Text Generation Complete!</div>
<p><strong>Generated Alt Text:</strong> <span id="alt-text">{}</span></p>"#,
                    encode_text(description.as_str())
                );
            }
            Outcome::Failure { message, .. } => {
                let _ = write!(
                    body,
                    r#"<div class="error" id="status">{}</div>"#,
                    encode_text(message)
                );
            }
        }
    }

    let refresh = if processing {
        r#"<meta http-equiv="refresh" content="2">"#
    } else {
        ""
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{refresh}
<title>{TITLE}</title>
<style>{STYLE}</style>
</head>
<body>
{body}
<script>{SCRIPT}</script>
</body>
</html>
"#
    )
}
