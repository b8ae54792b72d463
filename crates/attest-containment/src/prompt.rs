//! Judge prompts and answer parsing

/// Yes/no prompt asking whether a fact stands on its own
pub fn containment_prompt(response: &str, fact: &str) -> String {
    format!(
        "Determine if the following fact is self-contained within the original text.\n\
         A self-contained fact is one that doesn't require external context to understand.\n\n\
         Original text: {}\n\n\
         Fact to check: {}\n\n\
         Is this fact self-contained? Answer with only 'yes' or 'no'.",
        response, fact
    )
}

/// Prompt asking the judge to rewrite a fact so it stands on its own
pub fn rewrite_prompt(response: &str, context: Option<&str>, fact: &str) -> String {
    let mut prompt = String::from(
        "The following fact is not self-contained: it relies on the surrounding text \
         (pronouns, abbreviations, implicit subjects).\n\
         Rewrite this as a self-contained fact: replace every reference with the entity it \
         refers to and keep the meaning unchanged.\n\n",
    );
    prompt.push_str(&format!("Original text: {}\n\n", response));
    if let Some(context) = context {
        prompt.push_str(&format!("Context: {}\n\n", context));
    }
    prompt.push_str(&format!("Fact to make self-contained: {}\n\n", fact));
    prompt.push_str("Output only the rewritten fact.");
    prompt
}

/// Yes/no prompt asking whether a fact is relevant to a context
pub fn relevance_prompt(context: &str, fact: &str) -> String {
    format!(
        "Determine if the following fact is relevant to the given context.\n\n\
         Context: {}\n\n\
         Fact: {}\n\n\
         Is this fact relevant to the context? Answer with only 'yes' or 'no'.",
        context, fact
    )
}

/// `true` only for an answer that is exactly "yes" after trimming, any case
pub fn parse_yes_no(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("yes")
}

/// Lowercase whitespace-separated words
pub(crate) fn word_set(text: &str) -> std::collections::HashSet<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}
