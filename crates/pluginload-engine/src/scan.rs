use std::{io, path::Path};

use pluginload_host::SCRIPT_FILES;

/// Lists the script files directly inside `dir`, sorted by name.
///
/// Non-recursive on purpose: only scripts sitting in the picked folder are
/// loaded, matching what the folder dialog showed the user.
pub fn list_scripts(dir: &Path) -> io::Result<Vec<String>> {
    let mut scripts = Vec::new();

    for entry in dir.read_dir()? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let path = entry.path().to_string_lossy().into_owned();
        if SCRIPT_FILES.matches(&path) {
            scripts.push(path);
        }
    }

    scripts.sort();
    Ok(scripts)
}
