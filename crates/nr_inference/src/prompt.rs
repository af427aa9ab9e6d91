/// Editor prompt asking for exactly one JSON object.
pub fn build_prompt(title: &str, body: &str, source: &str, url: &str) -> String {
    format!(
        r#"You are an editor that returns strict JSON (no extra commentary).
Input:
Title: {title}
Body: {body}
Source: {source}
URL: {url}

Return exactly:
{{"category":"<one-word-category>","rewritten_headline":"...","summary":"~150 words summary","hashtags":["tag1","tag2"]}}"#
    )
}
