use std::{collections::HashSet, sync::Arc};

use rand::{seq::SliceRandom, Rng};
use serde_json::Value;

use super::domain::{NewCategoryData, DESCRIPTION_MAX_CHARS};

pub type DynCategorySeeder = Arc<dyn CategorySeeder + Send + Sync>;

/// A source of placeholder categories used to populate an empty store.
pub trait CategorySeeder {
    /// Generate data for `count` categories.
    ///
    /// Category codes are unique within a single batch.
    fn generate(&self, count: usize) -> Vec<NewCategoryData>;
}

const WORDS: &[&str] = &[
    "account", "budget", "cash", "charity", "clothing", "coffee", "credit", "debt", "dining",
    "education", "energy", "entertainment", "fees", "fitness", "fuel", "gifts", "groceries",
    "health", "hobbies", "home", "income", "insurance", "interest", "internet", "investment",
    "legal", "loan", "maintenance", "medical", "mortgage", "music", "office", "parking", "pets",
    "phone", "rent", "repairs", "salary", "savings", "shopping", "software", "sports",
    "subscriptions", "supplies", "taxes", "transport", "travel", "utilities", "vacation", "water",
];

/// Highest number that fits the three digits of a generated code.
const MAX_CODE_NUMBER: u16 = 999;

/// Generates categories from random words.
///
/// Codes take the form `CAT###`, names are a single capitalized word, and
/// descriptions are a short run of words no longer than the description
/// limit.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomCategorySeeder;

impl RandomCategorySeeder {
    fn word<R: Rng>(rng: &mut R) -> &'static str {
        WORDS.choose(rng).copied().unwrap_or("misc")
    }

    fn description<R: Rng>(rng: &mut R) -> String {
        let target_words = rng.gen_range(5..=25);

        let mut description = String::new();
        for _ in 0..target_words {
            let word = Self::word(rng);

            // Leave room for the separator and the closing period.
            if description.len() + word.len() + 2 > DESCRIPTION_MAX_CHARS {
                break;
            }

            if !description.is_empty() {
                description.push(' ');
            }
            description.push_str(word);
        }

        format!("{}.", capitalize(&description))
    }
}

impl CategorySeeder for RandomCategorySeeder {
    fn generate(&self, count: usize) -> Vec<NewCategoryData> {
        let mut rng = rand::thread_rng();

        let available_codes = usize::from(MAX_CODE_NUMBER) + 1;
        let mut used_codes = HashSet::with_capacity(count);

        (0..count)
            .map(|index| {
                // Fall back to sequential codes once the random space is used
                // up so that large batches still terminate.
                let number = if used_codes.len() < available_codes {
                    loop {
                        let candidate = rng.gen_range(0..=MAX_CODE_NUMBER);
                        if used_codes.insert(candidate) {
                            break u32::from(candidate);
                        }
                    }
                } else {
                    index as u32
                };

                NewCategoryData {
                    category_code: Some(Value::String(format!("CAT{:03}", number))),
                    name: Some(Value::String(capitalize(Self::word(&mut rng)))),
                    description: Some(Value::String(Self::description(&mut rng))),
                }
            })
            .collect()
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
