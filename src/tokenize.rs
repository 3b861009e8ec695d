//! Text normalization shared by indexing and querying.

/// Tokens this short or shorter carry no signal and are dropped.
pub const MIN_TOKEN_LEN: usize = 3;

const fn is_token_char(c: char) -> bool {
   c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_'
}

/// Lower-cases `text`, blanks out everything but `[a-z0-9-_]` and whitespace,
/// and splits on whitespace, keeping tokens of at least [`MIN_TOKEN_LEN`]
/// characters.
pub fn tokenize(text: &str) -> Vec<String> {
   let normalized: String = text
      .to_lowercase()
      .chars()
      .map(|c| if is_token_char(c) || c.is_whitespace() { c } else { ' ' })
      .collect();

   normalized
      .split_whitespace()
      .filter(|token| token.len() >= MIN_TOKEN_LEN)
      .map(str::to_string)
      .collect()
}

/// Like [`tokenize`] but keeps only the first occurrence of each token.
pub fn unique_tokens(text: &str) -> Vec<String> {
   let mut seen = std::collections::HashSet::new();
   tokenize(text)
      .into_iter()
      .filter(|token| seen.insert(token.clone()))
      .collect()
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_tokenize_punctuation_and_case() {
      let tokens = tokenize("Hello-World_123 test@example.com");
      assert_eq!(tokens, vec!["hello-world_123", "test", "example", "com"]);
   }

   #[test]
   fn test_tokenize_drops_short_tokens() {
      let tokens = tokenize("go to the API docs");
      assert!(!tokens.iter().any(|t| t == "to" || t == "go"));
      assert_eq!(tokens, vec!["the", "api", "docs"]);
      assert!(tokens.iter().all(|t| !t.is_empty()));
   }

   #[test]
   fn test_tokenize_non_ascii_is_separator() {
      assert_eq!(tokenize("café→résumé"), vec!["caf", "sum"]);
      assert!(tokenize("").is_empty());
      assert!(tokenize("  \t\n ").is_empty());
   }

   #[test]
   fn test_unique_tokens_keeps_first_occurrence() {
      assert_eq!(unique_tokens("api rest api graphql rest"), vec!["api", "rest", "graphql"]);
   }
}
