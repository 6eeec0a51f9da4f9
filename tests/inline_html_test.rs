use test_log::test;

use inline_html_compiler::{
    CachingContext, CompileError, Compiler, Document, HTML_MIME_TYPE,
};

mod common;
use common::{javascript_compiler, read_fixture};

const VALID_INPUTS: &[&str] = &["inline-valid.html", "inline-valid-2.html"];

fn reparse(html: &str) -> Document {
    Document::parse(html, "/output.html", false).unwrap()
}

#[test(tokio::test)]
async fn test_compiles_valid_fixtures() {
    for name in VALID_INPUTS {
        let (compiler, js) = javascript_compiler();
        let (path, code) = read_fixture(name);
        let mut cx = CachingContext::new();

        assert!(compiler.should_compile_file(&path, &mut cx).await);
        let deps = compiler
            .determine_dependent_files(&path, &code, &mut cx)
            .await
            .unwrap();
        assert_eq!(deps.len(), 0, "{}", name);

        let result = compiler.compile(&code, &path, &mut cx).await.unwrap();
        assert_eq!(result.mime_type, HTML_MIME_TYPE);
        assert_eq!(js.compiled(), 2, "{}", name);

        let out = reparse(&result.code);
        let scripts = out.query(&["script"]);
        assert!(!scripts.is_empty());
        for script in scripts {
            let text = script.text();
            if text.trim().len() < 2 {
                continue;
            }
            assert!(
                text.lines().any(|l| l.contains("sourceMappingURL")),
                "{}: script without source map reference: {}",
                name,
                text
            );
        }
    }
}

#[test(tokio::test)]
async fn test_uncompiled_regions_survive() {
    let (compiler, _) = javascript_compiler();
    let (path, code) = read_fixture("inline-valid-2.html");
    let mut cx = CachingContext::new();

    let result = compiler.compile(&code, &path, &mut cx).await.unwrap();
    let out = reparse(&result.code);

    let styles = out.query(&["style"]);
    assert_eq!(styles.len(), 1);
    assert_eq!(styles[0].attribute("type").as_deref(), Some("text/less"));
    assert!(styles[0].text().contains("@accent: #336699;"));
    assert!(!styles[0].text().contains("sourceMappingURL"));

    let scripts = out.query(&["script"]);
    assert_eq!(scripts[0].attribute("type").as_deref(), Some("module"));
}

#[test(tokio::test)]
async fn test_protocol_relative_links_become_https() {
    let (compiler, _) = javascript_compiler();
    let (path, code) = read_fixture("roboto.html");
    let mut cx = CachingContext::new();

    assert!(compiler.should_compile_file(&path, &mut cx).await);
    let deps = compiler
        .determine_dependent_files(&path, &code, &mut cx)
        .await
        .unwrap();
    assert_eq!(deps.len(), 0);

    let result = compiler.compile(&code, &path, &mut cx).await.unwrap();
    assert!(!result.code.is_empty());
    assert_eq!(result.mime_type, HTML_MIME_TYPE);

    let out = reparse(&result.code);
    let links = out.query(&["link"]);
    assert_eq!(links.len(), 1);
    let href = links[0].attribute("href").unwrap();
    assert!(href.to_ascii_lowercase().starts_with("https"), "{}", href);
}

#[test(tokio::test)]
async fn test_resource_reference_paths_canonicalized() {
    let (compiler, _) = javascript_compiler();
    let (path, code) = read_fixture("x-require-valid.html");
    let mut cx = CachingContext::new();

    assert!(compiler.should_compile_file(&path, &mut cx).await);
    let deps = compiler
        .determine_dependent_files(&path, &code, &mut cx)
        .await
        .unwrap();
    assert_eq!(deps.len(), 0);

    let result = compiler.compile(&code, &path, &mut cx).await.unwrap();
    assert_eq!(result.mime_type, HTML_MIME_TYPE);

    let out = reparse(&result.code);
    let requires = out.query(&["x-require"]);
    assert_eq!(requires.len(), 1);
    let src = requires[0].attribute("src").unwrap();
    assert!(src.ends_with("components/toolbar.html"), "{}", src);
    assert!(!src
        .split(['/', '\\'])
        .any(|segment| segment == "." || segment == ".."));
}

#[test(tokio::test)]
async fn test_traversal_fixture_rejected() {
    let (compiler, js) = javascript_compiler();
    let (path, code) = read_fixture("x-require-traversal.html");
    let mut cx = CachingContext::new();

    let err = compiler.compile(&code, &path, &mut cx).await.unwrap_err();
    assert!(matches!(err, CompileError::PathTraversalRejected { .. }));
    assert_eq!(err.code(), "INLINE-ERR-PATH-TRAVERSAL");
    assert_eq!(js.compiled(), 0);

    let sync_err = compiler.compile_sync(&code, &path, &mut cx).unwrap_err();
    assert_eq!(sync_err, err);
}

#[test(tokio::test)]
async fn test_blocking_and_suspending_forms_agree() {
    for name in [
        "inline-valid.html",
        "inline-valid-2.html",
        "roboto.html",
        "x-require-valid.html",
    ] {
        let (compiler, _) = javascript_compiler();
        let (path, code) = read_fixture(name);

        let mut cx = CachingContext::new();
        let suspended = compiler.compile(&code, &path, &mut cx).await.unwrap();
        let mut cx = CachingContext::new();
        let blocking = compiler.compile_sync(&code, &path, &mut cx).unwrap();
        assert_eq!(suspended, blocking, "{}", name);

        let mut cx = CachingContext::new();
        assert_eq!(
            compiler
                .determine_dependent_files(&path, &code, &mut cx)
                .await
                .unwrap(),
            compiler
                .determine_dependent_files_sync(&path, &code, &mut cx)
                .unwrap(),
        );
    }
}

#[test]
fn test_delegate_parse_error_names_region() {
    let (compiler, _) = javascript_compiler();
    let mut cx = CachingContext::new();
    let html = "<html><head><script>let = ;</script></head><body></body></html>";

    let err = compiler
        .compile_sync(html, "/site/broken.html", &mut cx)
        .unwrap_err();
    assert_eq!(err.region_identity(), Some("/site/broken.html:inline_0.js"));
    assert!(matches!(
        err,
        CompileError::DelegateCompile { ref source, .. }
            if matches!(**source, CompileError::Source { .. })
    ));
}
