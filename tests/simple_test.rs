use std::fs;
use std::path::Path;

use ccx::error::Error;
use ccx::resolver::TemplateResolver;
use ccx::simple::SimpleTemplate;
use ccx::template::Template;
use tempfile::TempDir;

const BASH_MANIFEST: &str = r#"name: bash
description: Create a bash script
post_gen: Edit the script
variables:
  filename:
    default: run.sh
  verbose: false
files:
  - name: bash_script.sh
    output: "{{ filename }}"
    executable: true
  - name: notes.txt
    output: "{% if verbose %}NOTES.txt{% endif %}"
"#;

const BASH_SCRIPT: &str = r#"#!/usr/bin/env bash
{% if verbose %}
set -x
{% endif %}
echo "{{ filename }}"
"#;

fn write_template(root: &Path, name: &str, files: &[(&str, &str)]) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    for (file, content) in files {
        fs::write(dir.join(file), content).unwrap();
    }
}

fn bash_template() -> (TempDir, SimpleTemplate) {
    let templates = TempDir::new().unwrap();
    write_template(
        templates.path(),
        "bash",
        &[("ccx.yml", BASH_MANIFEST), ("bash_script.sh", BASH_SCRIPT), ("notes.txt", "notes\n")],
    );
    let resolver = TemplateResolver::new(vec![templates.path().to_path_buf()]);
    let template = SimpleTemplate::new("bash", &resolver).unwrap();
    (templates, template)
}

fn args(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

#[test]
fn test_process_with_defaults() {
    let (_templates, template) = bash_template();
    let output = TempDir::new().unwrap();

    template.apply(&[], output.path(), false).unwrap();

    let script = fs::read_to_string(output.path().join("run.sh")).unwrap();
    assert_eq!(script, "#!/usr/bin/env bash\necho \"run.sh\"\n");
    assert!(!output.path().join("NOTES.txt").exists());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(output.path().join("run.sh")).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }
}

#[test]
fn test_process_with_arguments() {
    let (_templates, template) = bash_template();
    let output = TempDir::new().unwrap();

    template
        .apply(&args(&["--filename", "scripts/build.sh", "--verbose", "yes"]), output.path(), false)
        .unwrap();

    let script = fs::read_to_string(output.path().join("scripts/build.sh")).unwrap();
    assert_eq!(script, "#!/usr/bin/env bash\nset -x\necho \"scripts/build.sh\"\n");
    assert_eq!(fs::read_to_string(output.path().join("NOTES.txt")).unwrap(), "notes\n");
}

#[test]
fn test_existing_destination() {
    let (_templates, template) = bash_template();
    let output = TempDir::new().unwrap();
    let target = output.path().join("run.sh");
    fs::write(&target, "old").unwrap();

    let err = template.apply(&[], output.path(), false).unwrap_err();
    assert!(matches!(err, Error::DestinationExistsError { kind: "file", .. }));
    assert_eq!(
        err.to_string(),
        format!(
            "Destination file {} exists; to overwrite pass overwrite flag",
            target.display()
        )
    );
    assert_eq!(fs::read_to_string(&target).unwrap(), "old");

    template.apply(&[], output.path(), true).unwrap();
    assert!(fs::read_to_string(&target).unwrap().contains("echo"));
}

#[test]
fn test_binding_error_writes_nothing() {
    let (_templates, template) = bash_template();
    let output = TempDir::new().unwrap();

    let err = template.apply(&args(&["--unknown", "x"]), output.path(), false).unwrap_err();
    assert!(matches!(err, Error::ArgumentBindingError(_)));
    assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);
}

#[test]
fn test_doc() {
    let (_templates, template) = bash_template();
    let doc = template.doc().unwrap().render(false).unwrap();
    assert_eq!(
        doc,
        "
bash
----
Create a bash script

Variables
---------
- filename (default: run.sh)
- verbose (default: false)

Run
---
    ccx simple process bash --filename run.sh --verbose false

Post generation action
----------------------
Edit the script
"
    );
}

#[test]
fn test_template_without_variables() {
    let templates = TempDir::new().unwrap();
    write_template(templates.path(), "plain", &[("ccx.yml", "name: plain\nfiles: []\n")]);
    let resolver = TemplateResolver::new(vec![templates.path().to_path_buf()]);
    let template = SimpleTemplate::new("plain", &resolver).unwrap();

    let err = template.variables().unwrap_err();
    assert_eq!(err.to_string(), "Template without variables; just copy the files.");
}

#[test]
fn test_filters_in_output_names() {
    let templates = TempDir::new().unwrap();
    write_template(
        templates.path(),
        "java",
        &[
            (
                "ccx.yml",
                r#"variables:
  package:
    required: true
  class_name:
    required: true
files:
  - name: Class.java
    output: "src/{{ package | java_package_to_dir }}/{{ class_name }}.java"
"#,
            ),
            ("Class.java", "package {{ package }};\n// {{ class_name | snake_case }}\n"),
        ],
    );
    let resolver = TemplateResolver::new(vec![templates.path().to_path_buf()]);
    let template = SimpleTemplate::new("java", &resolver).unwrap();
    let output = TempDir::new().unwrap();

    template
        .apply(&args(&["--package", "com.example.app", "--class_name", "HttpServer"]), output.path(), false)
        .unwrap();

    let written =
        fs::read_to_string(output.path().join("src/com/example/app/HttpServer.java")).unwrap();
    assert_eq!(written, "package com.example.app;\n// http_server\n");
}

#[test]
fn test_missing_template() {
    let templates = TempDir::new().unwrap();
    let resolver = TemplateResolver::new(vec![templates.path().to_path_buf()]);
    assert!(matches!(
        SimpleTemplate::new("nope", &resolver),
        Err(Error::TemplateNotFoundError { .. })
    ));
}
