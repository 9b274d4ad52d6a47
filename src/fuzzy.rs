// Case-insensitive substring matching over anything with a name. Used for
// both cards and lists.

use crate::errors::TrelloMoveError;
use crate::ui::Prompt;
use anyhow::Result;
use tracing::debug;

/// Items the resolver can match on.
pub trait Named {
    fn name(&self) -> &str;
}

/// All items whose lowercased name contains the lowercased needle, in
/// haystack order.
pub fn find_matches<'a, T: Named>(needle: &str, haystack: &'a [T]) -> Vec<&'a T> {
    let needle = needle.to_lowercase();
    haystack
        .iter()
        .filter(|item| item.name().to_lowercase().contains(&needle))
        .collect()
}

/// Resolve `needle` to exactly one item.
///
/// No match is a `NoMatch` error listing every name in the haystack. A
/// single match is returned as is. Several matches are offered to the user
/// through `prompt` as a numbered list.
pub fn resolve<'a, T: Named>(
    needle: &str,
    haystack: &'a [T],
    prompt: &mut dyn Prompt,
) -> Result<&'a T> {
    let matches = find_matches(needle, haystack);
    debug!(needle, candidates = haystack.len(), matches = matches.len(), "fuzzy match");

    match matches.as_slice() {
        [] => Err(TrelloMoveError::NoMatch {
            needle: needle.to_string(),
            available: haystack.iter().map(|item| item.name().to_string()).collect(),
        }
        .into()),
        [only] => Ok(*only),
        _ => {
            let names: Vec<String> = matches.iter().map(|m| m.name().to_string()).collect();
            let heading = format!("Multiple matches found for '{needle}':");
            let index = prompt.choose(&heading, &names, "Select number")?;
            matches.get(index).copied().ok_or_else(|| {
                TrelloMoveError::InvalidSelection {
                    choice: index + 1,
                    count: matches.len(),
                }
                .into()
            })
        }
    }
}
