//! Static header and branding served at `/`.

pub const PROJECT_URL: &str = "https://github.com/pablosukaban/ai-summarizer";

pub fn render() -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Sumz - Article Summarizer</title>
</head>
<body>
  <header>
    <nav>
      <strong>Sumz</strong>
      <a href="{project}" target="_blank" rel="noopener">GitHub</a>
    </nav>
    <h1>Summarize articles with OpenAI GPT-4</h1>
    <h2>Simplify your reading with Summize, an open-source article summarizer
      that turns lengthy articles into clear and concise summaries.</h2>
  </header>
  <main>
    <p>State: <a href="/api/state">/api/state</a></p>
  </main>
</body>
</html>
"#,
        project = PROJECT_URL
    )
}
