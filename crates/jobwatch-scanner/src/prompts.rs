//! Prompt construction for job extraction.

/// Return the longest prefix of `html` holding at most `max_chars` characters.
#[must_use]
pub fn truncate_html(html: &str, max_chars: usize) -> &str {
    match html.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &html[..byte_idx],
        None => html,
    }
}

/// Build the extraction prompt around an already truncated HTML prefix.
#[must_use]
pub fn extraction_prompt(html: &str) -> String {
    format!(
        r#"Extract ALL job postings from this raw HTML content. Return ONLY a valid JSON array.

Return this exact format (return [] if no jobs found):
[
  {{
    "title": "Job Title",
    "company": "Company/Organization Name",
    "location": "City/Location",
    "type": "Full-time or Part-time or Contract",
    "deadline": "YYYY-MM-DD (estimate if not clear)",
    "description": "Brief 1-2 sentence job description",
    "salary": "Salary range or 'Varies' or 'Competitive'"
  }}
]

Rules:
- Extract EVERY job posting visible on the page
- If dates are unclear, estimate a reasonable deadline (30-60 days out)
- If information is missing, leave the field out
- Return ONLY the JSON array, no other text
- All values must be strings

HTML Content:
{html}"#
    )
}
