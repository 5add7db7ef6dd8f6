use std::cell::RefCell;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use docx_rs::{DocumentChild, Docx, Paragraph, Run, read_docx};

use mom_core::models::meeting::MeetingForm;
use mom_core::models::placeholder::{DEPT, Replacements};
use mom_export::convert::{DocumentConverter, OutputFormat};
use mom_export::docx::paragraph_text;
use mom_export::error::ExportError;
use mom_export::generate::Generator;

/// Copies the intermediate DOCX to the output and remembers where it was.
struct CopyConverter {
    seen: Rc<RefCell<Vec<PathBuf>>>,
}

impl DocumentConverter for CopyConverter {
    fn convert(
        &self,
        input: &Path,
        output: &Path,
        format: OutputFormat,
    ) -> Result<PathBuf, ExportError> {
        assert_eq!(format, OutputFormat::Pdf);
        assert!(input.is_file(), "intermediate file should exist during conversion");
        self.seen.borrow_mut().push(input.to_path_buf());
        fs::copy(input, output)?;
        Ok(output.to_path_buf())
    }
}

struct FailingConverter {
    seen: Rc<RefCell<Vec<PathBuf>>>,
}

impl DocumentConverter for FailingConverter {
    fn convert(
        &self,
        input: &Path,
        _output: &Path,
        _format: OutputFormat,
    ) -> Result<PathBuf, ExportError> {
        self.seen.borrow_mut().push(input.to_path_buf());
        Err(ExportError::Conversion {
            program: "fake".to_string(),
            status: "exit status: 1".to_string(),
            stderr: "boom".to_string(),
        })
    }
}

fn write_template(dir: &Path, paragraphs: &[&str]) -> PathBuf {
    let mut docx = Docx::new();
    for text in paragraphs {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)));
    }
    let mut buf = Cursor::new(Vec::new());
    docx.build().pack(&mut buf).unwrap();

    let path = dir.join("template.docx");
    fs::write(&path, buf.into_inner()).unwrap();
    path
}

fn body_texts(path: &Path) -> Vec<String> {
    let docx = read_docx(&fs::read(path).unwrap()).unwrap();
    docx.document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(p) => Some(paragraph_text(p)),
            _ => None,
        })
        .collect()
}

fn entries(dir: &Path) -> usize {
    fs::read_dir(dir).unwrap().count()
}

#[test]
fn pdf_generation_converts_then_removes_intermediate() {
    let templates = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let template = write_template(templates.path(), &["Department: {dept}"]);
    let output = out.path().join("output.pdf");

    let seen = Rc::new(RefCell::new(Vec::new()));
    let generator = Generator::new(Box::new(CopyConverter { seen: seen.clone() }))
        .work_dir(work.path());

    let mapping = Replacements::new().with(DEPT, "Design Team");
    generator.generate(&template, &output, &mapping).unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].starts_with(work.path()));
    assert_eq!(seen[0].extension().unwrap(), "docx");
    assert!(!seen[0].exists());
    assert_eq!(entries(work.path()), 0);

    assert_eq!(body_texts(&output), vec!["Department:Design Team"]);
}

#[test]
fn failed_conversion_still_removes_intermediate() {
    let dir = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let template = write_template(dir.path(), &["Department: {dept}"]);
    let output = dir.path().join("output.pdf");

    let seen = Rc::new(RefCell::new(Vec::new()));
    let generator = Generator::new(Box::new(FailingConverter { seen: seen.clone() }))
        .work_dir(work.path());

    let err = generator
        .generate(&template, &output, &Replacements::new().with(DEPT, "x"))
        .unwrap_err();

    assert!(matches!(err, ExportError::Conversion { .. }));
    assert_eq!(seen.borrow().len(), 1);
    assert!(!seen.borrow()[0].exists());
    assert_eq!(entries(work.path()), 0);
    assert!(!output.exists());
}

#[test]
fn intermediate_defaults_to_output_directory() {
    let dir = tempfile::tempdir().unwrap();
    let template = write_template(dir.path(), &["Department: {dept}"]);
    let output = dir.path().join("output.pdf");

    let seen = Rc::new(RefCell::new(Vec::new()));
    Generator::new(Box::new(CopyConverter { seen: seen.clone() }))
        .generate(&template, &output, &Replacements::new().with(DEPT, "x"))
        .unwrap();

    assert_eq!(seen.borrow()[0].parent().unwrap(), dir.path());
    // template + output only
    assert_eq!(entries(dir.path()), 2);
}

#[test]
fn docx_output_skips_the_converter() {
    let dir = tempfile::tempdir().unwrap();
    let template = write_template(dir.path(), &["Absent: {abs}"]);
    let output = dir.path().join("minutes.docx");

    let seen = Rc::new(RefCell::new(Vec::new()));
    let form = MeetingForm {
        department: "Design Team".to_string(),
        date: "28/12/2024".to_string(),
        start_time: "2:00 PM".to_string(),
        end_time: "4:00 PM".to_string(),
        agenda: "Deadlines".to_string(),
        absent: "Anurag, Tarun, Akshat".to_string(),
        notes: "one".to_string(),
    };

    Generator::new(Box::new(FailingConverter { seen: seen.clone() }))
        .format(OutputFormat::Docx)
        .generate(&template, &output, &form.into_replacements().unwrap())
        .unwrap();

    assert!(seen.borrow().is_empty());
    assert_eq!(
        body_texts(&output),
        vec!["Tarun", "Akshat", "Absent:Anurag"]
    );
}

#[test]
fn missing_template_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let err = Generator::new(Box::new(CopyConverter { seen }))
        .generate(
            &dir.path().join("nope.docx"),
            &dir.path().join("out.pdf"),
            &Replacements::new(),
        )
        .unwrap_err();

    assert!(matches!(err, ExportError::TemplateNotFound(_)));
}
