use crate::domain::model::{FileSet, FixedFiles};
use crate::utils::error::Result;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

/// Writes every uploaded file into a deflated zip, substituting the model's
/// version where one exists. Paths the model returned that were never
/// uploaded are not written.
pub fn build_archive(files: &FileSet, fixed: &FixedFiles) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    for file in files.iter() {
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let content = fixed
            .get(&file.path)
            .map(String::as_str)
            .unwrap_or(file.content.as_str());
        zip.start_file(file.path.as_str(), options)?;
        zip.write_all(content.as_bytes())?;
    }

    let cursor = zip.finish()?;
    let data = cursor.into_inner();
    tracing::debug!("Built archive with {} entries ({} bytes)", files.len(), data.len());
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn read_entry(archive: &mut zip::ZipArchive<std::io::Cursor<Vec<u8>>>, name: &str) -> String {
        let mut entry = archive.by_name(name).unwrap();
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_archive_prefers_fixed_content() {
        let files: FileSet = vec![("src/a.js", "broken"), ("src/b.js", "fine")]
            .into_iter()
            .collect();
        let mut fixed = FixedFiles::new();
        fixed.insert("src/a.js".to_string(), "repaired".to_string());
        fixed.insert("src/new.js".to_string(), "invented".to_string());

        let data = build_archive(&files, &fixed).unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(data)).unwrap();

        assert_eq!(archive.len(), 2);
        assert_eq!(read_entry(&mut archive, "src/a.js"), "repaired");
        assert_eq!(read_entry(&mut archive, "src/b.js"), "fine");
        assert!(archive.by_name("src/new.js").is_err());
    }

    #[test]
    fn test_archive_keeps_upload_order_and_deflates() {
        let files: FileSet = vec![("z.txt", "zzzz"), ("a.txt", "aaaa")]
            .into_iter()
            .collect();

        let data = build_archive(&files, &FixedFiles::new()).unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(data)).unwrap();

        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["z.txt", "a.txt"]);
        assert_eq!(
            archive.by_index(0).unwrap().compression(),
            CompressionMethod::Deflated
        );
    }

    #[test]
    fn test_empty_file_set_gives_empty_archive() {
        let data = build_archive(&FileSet::new(), &FixedFiles::new()).unwrap();
        let archive = zip::ZipArchive::new(std::io::Cursor::new(data)).unwrap();
        assert_eq!(archive.len(), 0);
    }
}
