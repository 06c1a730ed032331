//! Runs every project in `test-projects/` and compares its diagnostics

use integration_tests::{discover, projects_dir};
use pretty_assertions::assert_eq;

#[test]
fn test_all_projects() {
    let projects = discover(projects_dir()).expect("failed to load test projects");
    assert!(!projects.is_empty(), "no test projects found in {:?}", projects_dir());

    for project in &projects {
        let analysis = project.analyze().unwrap();
        assert_eq!(
            analysis.diagnostics, project.expected,
            "diagnostics of {}",
            project.name
        );
    }
}

#[test]
fn test_recovery_project_has_syntax_errors() {
    let projects = discover(projects_dir()).unwrap();
    let recovery = projects
        .iter()
        .find(|project| project.name == "04-recovery")
        .unwrap();

    let analysis = recovery.analyze().unwrap();
    assert!(!analysis.parsed.syntax_errors.is_empty());

    let mut strict = recovery.config;
    strict.lowering = va_lower::LowerConfig::default();
    assert!(va_driver::analyze(&recovery.source, &strict).is_err());
}

#[test]
fn test_imports_are_reported() {
    let projects = discover(projects_dir()).unwrap();
    let imports = projects
        .iter()
        .find(|project| project.name == "05-imports-and-scopes")
        .unwrap();

    let analysis = imports.analyze().unwrap();
    assert_eq!(analysis.symbols.imports, vec!["os", "net.http"]);
    assert_eq!(analysis.symbols.functions, 2);
}
