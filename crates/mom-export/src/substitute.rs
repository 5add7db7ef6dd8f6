use mom_core::models::placeholder::{PlaceholderKind, ReplacementValue, Replacements};

const BULLET: char = '\u{2022}';

/// Weight of a generated run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    /// The configured default weight.
    Inherit,
    Bold,
    Regular,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub weight: Weight,
}

impl TextRun {
    pub fn inherit(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            weight: Weight::Inherit,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            weight: Weight::Bold,
        }
    }

    pub fn regular(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            weight: Weight::Regular,
        }
    }
}

/// The rewrite of one paragraph that contained a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// The placeholder that matched.
    pub key: String,
    /// New paragraphs placed directly above the rewritten one, top to bottom.
    pub inserted_before: Vec<Vec<TextRun>>,
    /// Runs replacing the paragraph's original content.
    pub runs: Vec<TextRun>,
}

impl Substitution {
    fn starting_with(key: &str, before: &str) -> Self {
        let runs = if before.is_empty() {
            Vec::new()
        } else {
            vec![TextRun::inherit(before)]
        };
        Self {
            key: key.to_string(),
            inserted_before: Vec::new(),
            runs,
        }
    }

    /// Visible text of the rewritten paragraph.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// Resolves placeholders paragraph by paragraph across one document.
///
/// The combined time range is rendered once; after that both time keys are
/// skipped so a second time-key paragraph keeps its token.
pub struct Substituter<'a> {
    replacements: &'a Replacements,
    time_range_rendered: bool,
}

impl<'a> Substituter<'a> {
    pub fn new(replacements: &'a Replacements) -> Self {
        Self {
            replacements,
            time_range_rendered: false,
        }
    }

    /// Rewrite a paragraph given its concatenated text.
    ///
    /// Returns `None` when no mapped placeholder occurs in `text`. Only the
    /// first mapping entry found is resolved; any other token in the same
    /// text stays behind as literal text.
    pub fn substitute(&mut self, text: &str) -> Option<Substitution> {
        let replacements = self.replacements;
        for (placeholder, value) in replacements.iter() {
            let kind = placeholder.kind();
            if kind == PlaceholderKind::TimeRange && self.time_range_rendered {
                continue;
            }

            let Some((before, after)) = text.split_once(placeholder.key()) else {
                continue;
            };
            let before = before.trim();
            let after = after.trim();

            let mut substitution = Substitution::starting_with(placeholder.key(), before);

            match kind {
                PlaceholderKind::TimeRange => {
                    self.time_range_rendered = true;
                    let range = replacements.time_range();
                    let line = if before.is_empty() {
                        range
                    } else {
                        format!("{before} {range}")
                    };
                    substitution.runs = vec![TextRun::inherit(line)];
                    return Some(substitution);
                }
                PlaceholderKind::Scalar => {
                    if let ReplacementValue::Text(value) = value {
                        substitution.runs.push(TextRun::bold(value.as_str()));
                    }
                }
                PlaceholderKind::BulletList => {
                    substitution.inserted_before = value
                        .items()
                        .iter()
                        .map(|item| vec![TextRun::regular(format!("{BULLET} {item}"))])
                        .collect();
                }
                PlaceholderKind::BoldList => {
                    let mut items = value.items().iter();
                    if let Some(first) = items.next() {
                        substitution.runs.push(TextRun::bold(first.as_str()));
                    }
                    substitution.inserted_before =
                        items.map(|item| vec![TextRun::bold(item.as_str())]).collect();
                }
            }

            if !after.is_empty() {
                substitution.runs.push(TextRun::regular(after));
            }
            return Some(substitution);
        }

        None
    }
}

/// A paragraph of the output, in reading order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// The source paragraph at this index, unchanged.
    Original(usize),
    /// A paragraph generated from a list placeholder.
    Inserted(Vec<TextRun>),
    /// The source paragraph at this index with its runs replaced.
    Rewritten { source: usize, runs: Vec<TextRun> },
}

/// Run one substitution pass over paragraph texts and lay out the result.
pub fn substitute_paragraphs<S: AsRef<str>>(
    paragraphs: &[S],
    replacements: &Replacements,
) -> Vec<Block> {
    let mut substituter = Substituter::new(replacements);
    let mut blocks = Vec::with_capacity(paragraphs.len());

    for (index, text) in paragraphs.iter().enumerate() {
        match substituter.substitute(text.as_ref()) {
            Some(substitution) => {
                blocks.extend(substitution.inserted_before.into_iter().map(Block::Inserted));
                blocks.push(Block::Rewritten {
                    source: index,
                    runs: substitution.runs,
                });
            }
            None => blocks.push(Block::Original(index)),
        }
    }

    blocks
}
