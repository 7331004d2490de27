use anyhow::Context;
use noodles_bgzf as bgzf;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Opens a plain or gzipped text file. `stdin` reads from the screen.
///
/// ```
/// use std::io::BufRead;
/// let reader = snp2tree::reader("tests/data/cultivars.txt").unwrap();
/// assert_eq!(reader.lines().collect::<Vec<_>>().len(), 5);
/// ```
pub fn reader(input: &str) -> anyhow::Result<Box<dyn BufRead>> {
    let reader: Box<dyn BufRead> = if input == "stdin" {
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        let path = Path::new(input);
        let file = std::fs::File::open(path)
            .with_context(|| format!("could not open {}", path.display()))?;

        if path.extension() == Some(std::ffi::OsStr::new("gz")) {
            Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        }
    };

    Ok(reader)
}

pub fn writer(output: &str) -> anyhow::Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = if output == "stdout" {
        Box::new(BufWriter::new(std::io::stdout()))
    } else {
        let file = std::fs::File::create(output)
            .with_context(|| format!("could not create {}", output))?;
        Box::new(BufWriter::new(file))
    };

    Ok(writer)
}

/// Reads a list file: one entry per line, `#` comments and blank lines skipped.
///
/// ```
/// let names = snp2tree::read_list("tests/data/cultivars.txt").unwrap();
/// assert_eq!(names, vec!["Nipponbare", "IR64", "Kasalath"]);
/// ```
pub fn read_list(input: &str) -> anyhow::Result<Vec<String>> {
    let mut list = vec![];
    for line in reader(input)?.lines() {
        let line = line?;
        let entry = line.trim();
        if entry.is_empty() || entry.starts_with('#') {
            continue;
        }
        list.push(entry.to_string());
    }
    Ok(list)
}

/// Hands `f` a writer into a new BGZF file, and closes the file after it.
///
/// The result can be indexed by `tabix`.
pub fn with_bgzf_writer<T, F>(outfile: &Path, f: F) -> anyhow::Result<T>
where
    F: FnOnce(&mut dyn Write) -> anyhow::Result<T>,
{
    let inner_writer = BufWriter::new(
        std::fs::File::create(outfile)
            .with_context(|| format!("could not create {}", outfile.display()))?,
    );

    let mut writer =
        bgzf::MultithreadedWriter::with_worker_count(std::num::NonZeroUsize::MIN, inner_writer);

    let result = f(&mut writer)?;
    let mut inner_writer = writer.finish()?;
    inner_writer.flush()?;

    Ok(result)
}
