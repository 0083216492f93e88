use std::io::{Cursor, Read};
use std::path::Path;

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;

use super::{ExtractionError, TextExtractor};

const DOCUMENT_PART: &str = "word/document.xml";

/// Word (`.docx`) extraction: the text of each top-level body paragraph,
/// joined with newlines. Paragraphs nested in tables or text boxes are not
/// included.
pub struct DocxExtractor;

#[async_trait]
impl TextExtractor for DocxExtractor {
    async fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let bytes = tokio::fs::read(path).await?;
        let xml = read_document_part(bytes)?;
        let paragraphs = body_paragraphs(&xml)?;
        Ok(paragraphs.join("\n"))
    }
}

fn read_document_part(bytes: Vec<u8>) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionError::Docx(format!("not a zip archive: {e}")))?;
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractionError::Docx(format!("{DOCUMENT_PART}: {e}")))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)?;
    Ok(xml)
}

/// Subtrees whose paragraphs and markup never contribute body text: tables,
/// text boxes, the `mc:Fallback` copy of alternate content, and paragraph
/// properties (which hold tab-stop definitions named `w:tab`).
const SKIPPED_SUBTREES: &[&[u8]] = &[b"w:tbl", b"w:txbxContent", b"mc:Fallback", b"w:pPr"];

/// Walks `document.xml` and collects the text of every top-level `<w:p>`.
fn body_paragraphs(xml: &str) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut skip_depth = 0usize;
    let mut paragraph_depth = 0usize;
    let mut run_depth = 0usize;
    let mut in_text = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ExtractionError::Docx(format!("malformed XML: {e}")))?;

        match event {
            Event::Start(_) if skip_depth > 0 => skip_depth += 1,
            Event::End(_) if skip_depth > 0 => skip_depth -= 1,
            Event::Start(e) => {
                let name = e.name();
                match name.as_ref() {
                    n if SKIPPED_SUBTREES.contains(&n) => skip_depth = 1,
                    b"w:p" => {
                        paragraph_depth += 1;
                        if paragraph_depth == 1 {
                            current.clear();
                        }
                    }
                    b"w:r" => run_depth += 1,
                    b"w:t" => in_text = true,
                    _ => {}
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:p" => {
                    if paragraph_depth == 1 {
                        paragraphs.push(std::mem::take(&mut current));
                    }
                    paragraph_depth = paragraph_depth.saturating_sub(1);
                }
                b"w:r" => run_depth = run_depth.saturating_sub(1),
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Empty(_) if skip_depth > 0 => {}
            Event::Empty(e) => {
                let in_run = paragraph_depth > 0 && run_depth > 0;
                match e.name().as_ref() {
                    // <w:p/> is an empty paragraph; it still counts as a line.
                    b"w:p" if paragraph_depth == 0 => paragraphs.push(String::new()),
                    b"w:tab" if in_run => current.push('\t'),
                    b"w:br" | b"w:cr" if in_run => current.push('\n'),
                    _ => {}
                }
            }
            Event::Text(t) if skip_depth == 0 && in_text && paragraph_depth > 0 => {
                let unescaped = t
                    .unescape()
                    .map_err(|e| ExtractionError::Docx(format!("bad text run: {e}")))?;
                current.push_str(&unescaped);
            }
            Event::CData(t) if skip_depth == 0 && in_text && paragraph_depth > 0 => {
                current.push_str(&String::from_utf8_lossy(&t));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn document_xml(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        )
    }

    fn write_docx(path: &Path, parts: &[(&str, &str)]) {
        let file = std::fs::File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        for (name, contents) in parts {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(contents.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_paragraph_runs_are_concatenated() {
        let xml = document_xml(
            r#"<w:p><w:r><w:t>Jane </w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>Doe</w:t></w:r></w:p>
               <w:p><w:r><w:t xml:space="preserve">Rust &amp; Go</w:t></w:r></w:p>"#,
        );
        assert_eq!(body_paragraphs(&xml).unwrap(), vec!["Jane Doe", "Rust & Go"]);
    }

    #[test]
    fn test_tabs_breaks_and_empty_paragraphs() {
        let xml = document_xml(
            r#"<w:p><w:r><w:t>2019</w:t><w:tab/><w:t>Acme</w:t><w:br/><w:t>Engineer</w:t></w:r></w:p>
               <w:p/>
               <w:p><w:pPr><w:jc w:val="center"/></w:pPr></w:p>"#,
        );
        assert_eq!(
            body_paragraphs(&xml).unwrap(),
            vec!["2019\tAcme\nEngineer", "", ""]
        );
    }

    #[test]
    fn test_table_paragraphs_are_skipped() {
        let xml = document_xml(
            r#"<w:p><w:r><w:t>Skills</w:t></w:r></w:p>
               <w:tbl><w:tr><w:tc><w:p><w:r><w:t>in a cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
               <w:p><w:r><w:t>After table</w:t></w:r></w:p>"#,
        );
        assert_eq!(body_paragraphs(&xml).unwrap(), vec!["Skills", "After table"]);
    }

    #[test]
    fn test_text_box_does_not_split_enclosing_paragraph() {
        let xml = document_xml(
            r#"<w:p><w:r><w:t>Before</w:t></w:r><w:r><w:drawing><wps:txbx><w:txbxContent><w:p><w:r><w:t>Boxed</w:t></w:r></w:p></w:txbxContent></wps:txbx></w:drawing></w:r><w:r><w:t>After</w:t></w:r></w:p>
               <w:p><w:r><w:t>Next</w:t></w:r></w:p>"#,
        );
        assert_eq!(body_paragraphs(&xml).unwrap(), vec!["BeforeAfter", "Next"]);
    }

    #[test]
    fn test_alternate_content_fallback_is_not_duplicated() {
        let xml = document_xml(
            r#"<w:p><w:r><w:t>Jane Doe</w:t></w:r><w:r><mc:AlternateContent>
                 <mc:Choice Requires="wps"><w:drawing><wps:txbx><w:txbxContent><w:p><w:r><w:t>Contact</w:t></w:r></w:p></w:txbxContent></wps:txbx></w:drawing></mc:Choice>
                 <mc:Fallback><w:pict><v:textbox><w:txbxContent><w:p><w:r><w:t>Contact</w:t></w:r></w:p></w:txbxContent></v:textbox></w:pict></mc:Fallback>
               </mc:AlternateContent></w:r></w:p>"#,
        );
        assert_eq!(body_paragraphs(&xml).unwrap(), vec!["Jane Doe"]);
    }

    #[test]
    fn test_tab_stop_definitions_are_not_text() {
        let xml = document_xml(
            r#"<w:p><w:pPr><w:tabs><w:tab w:val="right" w:pos="9360"/></w:tabs></w:pPr><w:r><w:t>Acme Corp</w:t></w:r><w:r><w:tab/><w:t>2019 - 2023</w:t></w:r></w:p>"#,
        );
        assert_eq!(body_paragraphs(&xml).unwrap(), vec!["Acme Corp\t2019 - 2023"]);
    }

    #[test]
    fn test_instr_text_outside_w_t_is_ignored() {
        let xml = document_xml(
            r#"<w:p><w:r><w:instrText> PAGE </w:instrText></w:r><w:r><w:t>Page</w:t></w:r></w:p>"#,
        );
        assert_eq!(body_paragraphs(&xml).unwrap(), vec!["Page"]);
    }

    #[tokio::test]
    async fn test_extracts_from_docx_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.docx");
        let xml = document_xml(
            r#"<w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p><w:p><w:r><w:t>Staff Engineer</w:t></w:r></w:p>"#,
        );
        write_docx(
            &path,
            &[("[Content_Types].xml", "<Types/>"), (DOCUMENT_PART, xml.as_str())],
        );

        let text = DocxExtractor.extract(&path).await.unwrap();
        assert_eq!(text, "Jane Doe\nStaff Engineer");
    }

    #[tokio::test]
    async fn test_missing_document_part_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.docx");
        write_docx(&path, &[("[Content_Types].xml", "<Types/>")]);

        let err = DocxExtractor.extract(&path).await.unwrap_err();
        assert!(err.to_string().contains(DOCUMENT_PART), "{err}");
    }

    #[tokio::test]
    async fn test_non_zip_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.docx");
        std::fs::write(&path, "plain text pretending to be docx").unwrap();

        let err = DocxExtractor.extract(&path).await.unwrap_err();
        assert!(err.to_string().contains("not a zip archive"), "{err}");
    }
}
