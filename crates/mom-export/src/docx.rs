use std::io::Cursor;

use docx_rs::{DocumentChild, Docx, Paragraph, ParagraphChild, Run, RunChild, RunFonts, read_docx};
use tracing::debug;

use mom_core::models::placeholder::Replacements;

use crate::error::ExportError;
use crate::styles::DocumentStyles;
use crate::substitute::{Block, TextRun, Weight, substitute_paragraphs};

const NORMAL_STYLE: &str = "Normal";

/// Fill a DOCX template and return the packed result.
///
/// Sets the document defaults from `styles`, then rewrites every top-level body
/// paragraph that contains a mapped placeholder. Tables, headers and footers
/// are left alone.
pub fn fill_template(
    template: &[u8],
    replacements: &Replacements,
    styles: &DocumentStyles,
) -> Result<Vec<u8>, ExportError> {
    let docx = load_template(template)?;
    let docx = apply_default_style(docx, styles);
    let docx = substitute_document(docx, replacements, styles);
    pack(docx)
}

pub fn load_template(template: &[u8]) -> Result<Docx, ExportError> {
    read_docx(template).map_err(|e| ExportError::TemplateParse(e.to_string()))
}

pub fn pack(docx: Docx) -> Result<Vec<u8>, ExportError> {
    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| ExportError::Docx(e.to_string()))?;

    Ok(buf.into_inner())
}

/// Point the document defaults at the configured font and size.
///
/// The writer always emits its own empty `Normal` style ahead of the ones
/// carried in `styles.styles`, so a template's `Normal` is dropped here to
/// keep a single definition. Weight cannot be set at the defaults level,
/// so every generated run carries it explicitly.
pub fn apply_default_style(docx: Docx, styles: &DocumentStyles) -> Docx {
    let mut docx = docx
        .default_fonts(run_fonts(styles))
        .default_size(styles.half_points());
    docx.styles.styles.retain(|s| s.style_id != NORMAL_STYLE);
    docx
}

/// Run one substitution pass over the body, splicing generated paragraphs in
/// above the paragraph they came from.
///
/// Only top-level paragraphs take part; any other child keeps its position
/// relative to the paragraphs around it.
pub fn substitute_document(
    mut docx: Docx,
    replacements: &Replacements,
    styles: &DocumentStyles,
) -> Docx {
    let children = std::mem::take(&mut docx.document.children);
    let texts: Vec<String> = children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(paragraph) => Some(paragraph_text(paragraph)),
            _ => None,
        })
        .collect();

    let mut blocks = substitute_paragraphs(&texts, replacements).into_iter();
    let mut rewritten = Vec::with_capacity(children.len());

    for child in children {
        let paragraph = match child {
            DocumentChild::Paragraph(paragraph) => paragraph,
            other => {
                rewritten.push(other);
                continue;
            }
        };

        // Inserted blocks precede the block for their source paragraph.
        let mut inserted = 0usize;
        for block in blocks.by_ref() {
            match block {
                Block::Inserted(runs) => {
                    let paragraph =
                        add_runs(Paragraph::new().style(NORMAL_STYLE), &runs, styles);
                    rewritten.push(DocumentChild::Paragraph(Box::new(paragraph)));
                    inserted += 1;
                }
                Block::Original(_) => {
                    rewritten.push(DocumentChild::Paragraph(paragraph));
                    break;
                }
                Block::Rewritten { source, runs } => {
                    debug!(paragraph = source, inserted, "substituted placeholder");
                    let mut paragraph = *paragraph;
                    paragraph.children.clear();
                    let paragraph = add_runs(paragraph, &runs, styles);
                    rewritten.push(DocumentChild::Paragraph(Box::new(paragraph)));
                    break;
                }
            }
        }
    }

    docx.document.children = rewritten;
    docx
}

/// Concatenated text of a paragraph's runs, hyperlinks included.
pub fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    collect_text(&paragraph.children, &mut text);
    text
}

fn collect_text(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => out.push_str(&t.text),
                        RunChild::Tab(_) => out.push('\t'),
                        RunChild::Break(_) => out.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => collect_text(&link.children, out),
            _ => {}
        }
    }
}

fn add_runs(mut paragraph: Paragraph, runs: &[TextRun], styles: &DocumentStyles) -> Paragraph {
    for run in runs {
        paragraph = paragraph.add_run(to_run(run, styles));
    }
    paragraph
}

/// Every generated run states its font, size and weight. `Inherit` takes the
/// configured default weight.
fn to_run(run: &TextRun, styles: &DocumentStyles) -> Run {
    let bold = match run.weight {
        Weight::Inherit => styles.default_bold,
        Weight::Bold => true,
        Weight::Regular => false,
    };
    let run = Run::new()
        .add_text(&run.text)
        .fonts(run_fonts(styles))
        .size(styles.half_points());
    if bold { run.bold() } else { run.disable_bold() }
}

fn run_fonts(styles: &DocumentStyles) -> RunFonts {
    RunFonts::new()
        .ascii(&styles.font_family)
        .hi_ansi(&styles.font_family)
        .cs(&styles.font_family)
}
