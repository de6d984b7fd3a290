use super::*;
use crate::common::*;
use walkdir::WalkDir;

/// List the names of the immediate subdirectories of `dir` in byte order.
///
/// Symbolic links to directories count as subdirectories.
pub fn list_classes(dir: impl AsRef<Path>) -> Result<IndexSet<String>> {
    let dir = dir.as_ref();
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to list directory '{}'", dir.display()))?
        .map(|entry| -> Result<_> {
            let entry = entry?;
            if !entry.path().is_dir() {
                return Ok(None);
            }
            let name = entry
                .file_name()
                .into_string()
                .map_err(|name| format_err!("class directory name {:?} is not valid UTF-8", name))?;
            Ok(Some(name))
        })
        .filter_map(|result| result.transpose())
        .try_collect()?;
    names.sort();

    Ok(names.into_iter().collect())
}

/// Collect every regular file under each class directory of `split_dir`.
///
/// Symbolic links are followed. Files of a class are sorted by the raw
/// bytes of the parent directory path and then by file name, so `a-b/`
/// comes before `a/b/`.
pub fn find_samples(split_dir: impl AsRef<Path>, classes: &IndexSet<String>) -> Result<Vec<Sample>> {
    let split_dir = split_dir.as_ref();
    let mut samples = vec![];

    for (class_index, class_name) in classes.iter().enumerate() {
        let class_dir = split_dir.join(class_name);
        let mut files: Vec<PathBuf> = WalkDir::new(&class_dir)
            .follow_links(true)
            .into_iter()
            .map(|entry| -> Result<_> {
                let entry = entry
                    .with_context(|| format!("failed to walk directory '{}'", class_dir.display()))?;
                Ok(entry.file_type().is_file().then(|| entry.into_path()))
            })
            .filter_map(|result| result.transpose())
            .try_collect()?;

        files.sort_by(|lhs, rhs| {
            let lhs_dir = lhs.parent().map(Path::as_os_str);
            let rhs_dir = rhs.parent().map(Path::as_os_str);
            lhs_dir
                .cmp(&rhs_dir)
                .then_with(|| lhs.file_name().cmp(&rhs.file_name()))
        });

        samples.extend(files.into_iter().map(|path| Sample { path, class_index }));
    }

    Ok(samples)
}
