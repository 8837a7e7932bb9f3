//! Standalone HTML report for the download button.
//!
//! Output is a pure function of the `AnalysisResult`: same input, same bytes.
//! Every score appears twice, as a bar row carrying `data-dimension` and
//! `data-value`, and inside the `soulsync-scores` JSON blob.

use std::fmt::Write;

use crate::models::AnalysisResult;

const STYLESHEET: &str = r#"
    :root { --primary: #8b5cf6; --secondary: #ec4899; --bg: #09090b; --text: #ffffff; }
    body { margin: 0; font-family: 'Inter', sans-serif; background: var(--bg); color: var(--text); }
    .bg-animate { position: fixed; inset: 0; z-index: -1; background: linear-gradient(45deg, #1e1b4b, #312e81, #4c1d95, #831843); background-size: 400% 400%; animation: gradientBG 15s ease infinite; }
    @keyframes gradientBG { 0% { background-position: 0% 50%; } 50% { background-position: 100% 50%; } 100% { background-position: 0% 50%; } }
    .container { max-width: 800px; margin: 0 auto; padding: 40px 20px; }
    header { text-align: center; margin-bottom: 60px; }
    h1 { font-family: 'Space Grotesk', sans-serif; font-size: 3.5rem; margin: 0; text-transform: uppercase; letter-spacing: -2px; }
    .card { background: rgba(255, 255, 255, 0.05); border: 1px solid rgba(255, 255, 255, 0.1); border-radius: 24px; padding: 30px; margin-bottom: 40px; }
    .image-container { text-align: center; margin: 40px 0; }
    .generated-img { max-width: 100%; border-radius: 12px; border: 4px solid #000; box-shadow: 10px 10px 0 var(--primary); }
    .code-badge { display: inline-block; background: #000; padding: 10px 20px; font-family: monospace; font-size: 2rem; border: 2px solid #fff; margin-top: 20px; }
    .stat-row { display: flex; align-items: center; margin-bottom: 12px; }
    .stat-label { width: 140px; font-size: 0.9rem; color: #d4d4d8; }
    .bar-container { flex: 1; height: 8px; background: #27272a; border-radius: 4px; overflow: hidden; margin: 0 15px; }
    .bar-fill { height: 100%; background: linear-gradient(90deg, var(--primary), var(--secondary)); }
    .stat-val { width: 40px; text-align: right; font-family: monospace; }
    footer { text-align: center; padding: 40px 0; font-size: 0.8rem; opacity: 0.6; }
"#;

/// Download name for a result, e.g. `SoulSync-Report-Ap.html`.
pub fn report_file_name(result: &AnalysisResult) -> String {
    let code: String = result
        .two_letter_code
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    format!("SoulSync-Report-{code}.html")
}

pub fn generate_html_report(result: &AnalysisResult) -> String {
    let style_name = html_escape(&result.attachment_style_name);

    let mut bars = String::new();
    for (dimension, value) in &result.scores {
        let _ = write!(
            bars,
            r#"
      <div class="stat-row" data-dimension="{dim}" data-value="{value}">
        <span class="stat-label">{dim}</span>
        <div class="bar-container"><div class="bar-fill" style="width: {value}%"></div></div>
        <span class="stat-val">{value}%</span>
      </div>"#,
            dim = html_escape(dimension.as_str()),
        );
    }

    let image = match result.images.main.as_deref() {
        Some(uri) => format!(
            r#"
    <div class="image-container">
      <img src="{}" alt="Attachment soul illustration" class="generated-img" width="400">
    </div>"#,
            html_escape(uri)
        ),
        None => String::new(),
    };

    let scores_json = serde_json::to_string(&result.scores)
        .unwrap_or_else(|_| "{}".to_string())
        .replace("</", "<\\/");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>SoulSync Report - {style_name}</title>
  <style>{STYLESHEET}</style>
</head>
<body>
  <div class="bg-animate"></div>
  <div class="container">
    <header>
      <p style="text-transform: uppercase; letter-spacing: 4px;">SoulSync Analysis</p>
      <h1>{style_name}</h1>
      <div class="code-badge">{code}</div>
    </header>

    <div class="card">
      <h2>Executive Summary</h2>
      <p>{summary}</p>
    </div>
{image}
    <div class="card">
      <h2>Dimensions</h2>{bars}
    </div>

    <div class="card">
      <h3>The {tarot_name}</h3>
      <p>{tarot_meaning}</p>
    </div>

    <div class="card">
      <h3>{song_title} - {song_artist}</h3>
      <p>{song_reason}</p>
    </div>

    <footer>SoulSync</footer>
  </div>
  <script type="application/json" id="soulsync-scores">{scores_json}</script>
</body>
</html>
"#,
        code = html_escape(&result.two_letter_code),
        summary = html_escape(&result.summary),
        tarot_name = html_escape(&result.tarot.card_name),
        tarot_meaning = html_escape(&result.tarot.meaning),
        song_title = html_escape(&result.song.title),
        song_artist = html_escape(&result.song.artist),
        song_reason = html_escape(&result.song.reason),
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
