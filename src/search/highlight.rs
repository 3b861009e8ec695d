//! Context snippets around matched query terms.

use crate::types::SearchHighlight;

/// Characters of context kept on each side of a match.
pub const SNIPPET_CONTEXT: usize = 30;

const ELLIPSIS: &str = "...";

fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
   if needle.is_empty() || needle.len() > haystack.len() {
      return None;
   }
   haystack
      .as_bytes()
      .windows(needle.len())
      .position(|w| w.eq_ignore_ascii_case(needle.as_bytes()))
}

/// Byte offset `SNIPPET_CONTEXT` characters before `at`, or the start.
fn context_start(content: &str, at: usize) -> usize {
   content[..at]
      .char_indices()
      .rev()
      .nth(SNIPPET_CONTEXT - 1)
      .map_or(0, |(i, _)| i)
}

/// Byte offset `SNIPPET_CONTEXT` characters after `from`, or the end.
fn context_end(content: &str, from: usize) -> usize {
   content[from..]
      .char_indices()
      .nth(SNIPPET_CONTEXT)
      .map_or(content.len(), |(i, _)| from + i)
}

/// One highlight per query token found in `content`, built around its first
/// occurrence.
pub fn highlights(content: &str, query_tokens: &[String]) -> Vec<SearchHighlight> {
   query_tokens
      .iter()
      .filter_map(|token| {
         let at = find_ci(content, token)?;
         let start = context_start(content, at);
         let end = context_end(content, at + token.len());

         Some(SearchHighlight {
            field:          "content".to_string(),
            snippet:        format!("{ELLIPSIS}{}{ELLIPSIS}", &content[start..end]),
            matched_tokens: vec![token.clone()],
         })
      })
      .collect()
}
