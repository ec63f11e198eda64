//! Bootstraps a fresh installation: a sample configuration and an example template.

use std::fs;
use std::path::PathBuf;

use log::{info, warn};

use crate::config::Config;
use crate::constants::MANIFEST_FILE;
use crate::error::Result;
use crate::materialize::write_file;

/// Name of the example simple template.
pub const EXAMPLE_TEMPLATE_NAME: &str = "cpp";

pub const SAMPLE_CONFIG: &str = r#"simple_templates:
  paths:
    - ~/.ccx/simple-templates

cookiecutter_templates:
  paths:
    - ~/.ccx/cookiecutter-templates
"#;

pub const CPP_MANIFEST: &str = r#"name: cpp
description: Generate CPP and H with include protection

variables:
  class_name:
    required: true
    type: string

files:
  - name: cpp.cpp
    output: "{{ class_name | remove_extension }}.cpp"
  - name: cpp.h
    output: "{{ class_name | remove_extension }}.h"
"#;

pub const CPP_SOURCE: &str = r#"#include "{{ class_name | remove_extension }}.h"
"#;

pub const CPP_HEADER: &str = r#"#ifndef __{{ class_name | remove_extension | snake_case | upper }}_H__
#define __{{ class_name | remove_extension | snake_case | upper }}_H__

class {{class_name}} {

public:
    virtual void action();
};

#endif
"#;

/// Writes the sample configuration unless one exists.
///
/// # Returns
/// * `Result<bool>` - Whether the file was written
pub fn generate_config(config: &Config) -> Result<bool> {
    let path = config.configs_path();
    if path.exists() {
        warn!("Config file {} exists, not overwriting", path.display());
        return Ok(false);
    }

    info!("Writing {}", path.display());
    write_file(SAMPLE_CONFIG, path)?;
    Ok(true)
}

/// Writes the `cpp` example into the first simple template search path.
///
/// # Returns
/// * `Result<Option<PathBuf>>` - Template directory, or `None` if a non-empty one already existed
pub fn generate_example_template(config: &Config) -> Result<Option<PathBuf>> {
    let Some(root) = config.simple_template_paths()?.into_iter().next() else {
        return Ok(None);
    };
    let template_dir = root.join(EXAMPLE_TEMPLATE_NAME);

    if template_dir.exists() && fs::read_dir(&template_dir)?.next().is_some() {
        warn!("{} example template exists; not overwriting", EXAMPLE_TEMPLATE_NAME);
        return Ok(None);
    }

    for (file, content) in [
        (MANIFEST_FILE, CPP_MANIFEST),
        ("cpp.cpp", CPP_SOURCE),
        ("cpp.h", CPP_HEADER),
    ] {
        let path = template_dir.join(file);
        info!("Writing {}", path.display());
        write_file(content, path)?;
    }

    Ok(Some(template_dir))
}
