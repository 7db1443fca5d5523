use std::fmt;

use indexmap::IndexMap;
use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Number of questions asked in a single match when the bank is large enough.
pub const QUESTIONS_PER_MATCH: usize = 10;
/// Every question offers exactly this many answers.
pub const OPTION_COUNT: usize = 4;

/// Difficulty tier selecting the question pool, countdown and opponent strength.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// Generous countdown, gentle opponent.
    Easy,
    /// Default tier.
    #[default]
    Intermediate,
    /// Short countdown, aggressive opponent.
    Hard,
}

impl Level {
    /// All levels in display order.
    pub const ALL: [Level; 3] = [Level::Easy, Level::Intermediate, Level::Hard];

    /// Capitalized label used in user-facing text.
    pub fn label(self) -> &'static str {
        match self {
            Level::Easy => "Easy",
            Level::Intermediate => "Intermediate",
            Level::Hard => "Hard",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A multiple-choice question with exactly four options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Question {
    /// Text shown to the player.
    pub prompt: String,
    /// Candidate answers, in display order.
    pub options: [String; OPTION_COUNT],
    /// Index into `options` of the right answer.
    pub correct_option: usize,
}

impl Question {
    fn new(prompt: &str, options: [&str; OPTION_COUNT], correct_option: usize) -> Self {
        Self {
            prompt: prompt.to_string(),
            options: options.map(str::to_string),
            correct_option,
        }
    }

    /// Whether `index` designates the correct answer.
    pub fn is_correct(&self, index: usize) -> bool {
        self.correct_option == index
    }
}

/// Immutable mapping from level to its ordered pool of questions.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    pools: IndexMap<Level, Vec<Question>>,
}

impl QuestionBank {
    /// Build a bank from explicit pools. Levels missing from `pools` get an empty pool.
    pub fn new(mut pools: IndexMap<Level, Vec<Question>>) -> Self {
        for level in Level::ALL {
            pools.entry(level).or_default();
        }
        Self { pools }
    }

    /// Questions available for `level`, in authoring order.
    pub fn pool(&self, level: Level) -> &[Question] {
        self.pools.get(&level).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Draw a fresh, uniformly shuffled subset of at most [`QUESTIONS_PER_MATCH`] questions.
    pub fn sample<R: Rng + ?Sized>(&self, level: Level, rng: &mut R) -> Vec<Question> {
        sample_questions(self.pool(level), QUESTIONS_PER_MATCH, rng)
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::new(default_pools())
    }
}

/// Shuffle a copy of `pool` (Fisher-Yates) and keep its first `limit` entries.
pub fn sample_questions<R: Rng + ?Sized>(
    pool: &[Question],
    limit: usize,
    rng: &mut R,
) -> Vec<Question> {
    let mut questions = pool.to_vec();
    questions.shuffle(rng);
    questions.truncate(limit);
    questions
}

fn default_pools() -> IndexMap<Level, Vec<Question>> {
    let mut pools = IndexMap::new();
    pools.insert(
        Level::Easy,
        vec![
            Question::new(
                "What color is the sky on a clear day?",
                ["Blue", "Green", "Red", "Black"],
                0,
            ),
            Question::new("What is 2 + 2?", ["3", "4", "5", "6"], 1),
            Question::new("Which animal barks?", ["Cat", "Dog", "Bird", "Fish"], 1),
            Question::new("What do we call frozen water?", ["Steam", "Ice", "Fog", "Rain"], 1),
            Question::new(
                "Which shape has 4 equal sides?",
                ["Triangle", "Circle", "Square", "Line"],
                2,
            ),
            Question::new(
                "Which fruit is yellow and curved?",
                ["Apple", "Banana", "Grapes", "Orange"],
                1,
            ),
            Question::new("What is the opposite of 'up'?", ["Left", "Right", "Down", "Across"], 2),
            Question::new(
                "Which season is hot and sunny (generally)?",
                ["Winter", "Spring", "Autumn", "Summer"],
                3,
            ),
            Question::new("Which one is a vehicle?", ["Car", "Tree", "House", "Shoe"], 0),
            Question::new("What sound does a cow make?", ["Moo", "Baa", "Neigh", "Meow"], 0),
        ],
    );
    pools.insert(
        Level::Intermediate,
        vec![
            Question::new("Capital of France?", ["Lyon", "Paris", "Marseille", "Nice"], 1),
            Question::new(
                "Which language powers React?",
                ["Python", "JavaScript", "Ruby", "Go"],
                1,
            ),
            Question::new(
                "What does CSS stand for?",
                [
                    "Cascading Style Sheets",
                    "Computer Style Sheets",
                    "Creative Style System",
                    "Control Style Sheet",
                ],
                0,
            ),
            Question::new(
                "HTML stands for?",
                [
                    "HyperText Markup Language",
                    "Home Tool Markup",
                    "Hyperlinks Text",
                    "Hyperlink Machine",
                ],
                0,
            ),
            Question::new(
                "Which one is a JavaScript framework?",
                ["Laravel", "Django", "Vue", "Rails"],
                2,
            ),
            Question::new(
                "Which planet is known as the Red Planet?",
                ["Venus", "Earth", "Mars", "Mercury"],
                2,
            ),
            Question::new(
                "Which company created Windows OS?",
                ["Apple", "Microsoft", "Google", "IBM"],
                1,
            ),
            Question::new(
                "Which is a package manager for JavaScript?",
                ["npm", "pip", "gem", "composer"],
                0,
            ),
            Question::new("2 * 6 - 3 = ?", ["9", "12", "15", "10"], 0),
            Question::new(
                "In CSS, which property controls flex direction?",
                ["flex-direction", "direction", "flow", "layout"],
                0,
            ),
        ],
    );
    pools.insert(
        Level::Hard,
        vec![
            Question::new(
                "Which sorting algorithm has average O(n log n)?",
                ["Bubble", "Selection", "QuickSort", "Insertion"],
                2,
            ),
            Question::new(
                "What is a closure in JavaScript?",
                [
                    "A function and its lexical environment",
                    "A database",
                    "A CSS rule",
                    "An HTML tag",
                ],
                0,
            ),
            Question::new("Which HTTP status means 'Not Found'?", ["200", "301", "404", "500"], 2),
            Question::new(
                "What does SQL stand for?",
                [
                    "Structured Query Language",
                    "Simple Query Language",
                    "Sequential Query Logic",
                    "Server Query Language",
                ],
                0,
            ),
            Question::new(
                "Which data structure uses FIFO?",
                ["Stack", "Queue", "Tree", "Graph"],
                1,
            ),
            Question::new(
                "Which complexity is exponential growth?",
                ["O(n)", "O(log n)", "O(n^2)", "O(2^n)"],
                3,
            ),
            Question::new(
                "Which protocol secures traffic with TLS?",
                ["HTTP", "FTP", "HTTPS", "SMTP"],
                2,
            ),
            Question::new(
                "What is memoization?",
                [
                    "Caching results of function calls",
                    "Sorting technique",
                    "Database replication",
                    "A CSS concept",
                ],
                0,
            ),
            Question::new(
                "Which keyword creates a new class instance in JS?",
                ["init", "new", "create", "instance"],
                1,
            ),
            Question::new(
                "In React, which hook is used for side effects?",
                ["useState", "useEffect", "useRef", "useMemo"],
                1,
            ),
        ],
    );
    pools
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn numbered_pool(count: usize) -> Vec<Question> {
        (0..count)
            .map(|i| Question::new(&format!("q{i}"), ["a", "b", "c", "d"], i % OPTION_COUNT))
            .collect()
    }

    #[test]
    fn default_bank_has_ten_questions_per_level() {
        let bank = QuestionBank::default();
        for level in Level::ALL {
            let pool = bank.pool(level);
            assert_eq!(pool.len(), 10, "level {level}");
            assert!(pool.iter().all(|q| q.correct_option < OPTION_COUNT));
        }
    }

    #[test]
    fn sample_has_expected_length_and_no_duplicates() {
        let bank = QuestionBank::default();
        let mut rng = StdRng::seed_from_u64(7);
        for level in Level::ALL {
            for _ in 0..50 {
                let sample = bank.sample(level, &mut rng);
                assert_eq!(sample.len(), QUESTIONS_PER_MATCH.min(bank.pool(level).len()));
                let prompts: HashSet<_> = sample.iter().map(|q| q.prompt.as_str()).collect();
                assert_eq!(prompts.len(), sample.len());
            }
        }
    }

    #[test]
    fn sample_truncates_large_pools_and_keeps_small_ones_whole() {
        let mut rng = StdRng::seed_from_u64(11);
        assert_eq!(sample_questions(&numbered_pool(25), QUESTIONS_PER_MATCH, &mut rng).len(), 10);
        assert_eq!(sample_questions(&numbered_pool(4), QUESTIONS_PER_MATCH, &mut rng).len(), 4);
        assert!(sample_questions(&[], QUESTIONS_PER_MATCH, &mut rng).is_empty());
    }

    #[test]
    fn shuffle_is_roughly_uniform_over_permutations() {
        let pool = numbered_pool(3);
        let mut rng = StdRng::seed_from_u64(42);
        let trials = 60_000;
        let mut counts: HashMap<Vec<String>, usize> = HashMap::new();
        for _ in 0..trials {
            let order = sample_questions(&pool, QUESTIONS_PER_MATCH, &mut rng)
                .into_iter()
                .map(|q| q.prompt)
                .collect();
            *counts.entry(order).or_default() += 1;
        }

        assert_eq!(counts.len(), 6);
        let expected = trials as f64 / 6.0;
        for (order, count) in counts {
            let deviation = (count as f64 - expected).abs() / expected;
            assert!(deviation < 0.05, "permutation {order:?} seen {count} times");
        }
    }

    #[test]
    fn missing_levels_get_empty_pools() {
        let mut pools = IndexMap::new();
        pools.insert(Level::Hard, numbered_pool(2));
        let bank = QuestionBank::new(pools);
        assert!(bank.pool(Level::Easy).is_empty());
        assert_eq!(bank.pool(Level::Hard).len(), 2);
    }

    #[test]
    fn level_labels_are_capitalized() {
        assert_eq!(Level::Easy.to_string(), "Easy");
        assert_eq!(Level::Intermediate.label(), "Intermediate");
        assert_eq!(Level::default(), Level::Intermediate);
    }
}
