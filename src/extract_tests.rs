#[cfg(test)]
mod tests {
    use crate::document::Document;
    use crate::extract::{extract, LinkKind, RegionKind};
    use crate::options::InlineCompilerOptions;

    fn parse(html: &str) -> Document {
        Document::parse(html, "/app/index.html", false).unwrap()
    }

    #[test]
    fn test_regions_in_document_order() {
        let doc = parse(
            r#"<!DOCTYPE html>
            <html>
            <head>
                <link rel="stylesheet" href="site.css">
                <style type="text/less">@c: red;</style>
                <script src="vendor.js"></script>
                <script>const x = 1;</script>
            </head>
            <body>
                <x-require src="a/b.js"></x-require>
                <script type="text/typescript">let y: number = 2;</script>
            </body>
            </html>"#,
        );
        let extraction = extract(&doc, &InlineCompilerOptions::default());

        let kinds: Vec<RegionKind> = extraction.regions.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RegionKind::Style,
                RegionKind::Script,
                RegionKind::ResourceReference,
                RegionKind::Script
            ]
        );
        let ordinals: Vec<usize> = extraction.regions.iter().map(|r| r.ordinal).collect();
        assert_eq!(ordinals, vec![0, 1, 2, 3]);

        // link, style, script[src], script, x-require, script
        let indexes: Vec<usize> = extraction
            .regions
            .iter()
            .map(|r| r.element_index)
            .collect();
        assert_eq!(indexes, vec![1, 3, 4, 5]);

        assert_eq!(extraction.links.len(), 2);
        assert_eq!(extraction.links[0].kind, LinkKind::Link);
        assert_eq!(extraction.links[0].url, "site.css");
        assert_eq!(extraction.links[0].rel.as_deref(), Some("stylesheet"));
        assert_eq!(extraction.links[1].kind, LinkKind::Script);
        assert_eq!(extraction.links[1].attribute_name(), "src");
    }

    #[test]
    fn test_mime_type_resolution() {
        let doc = parse(
            r#"<html><head>
                <script>plain()</script>
                <script type="Text/TypeScript">typed()</script>
                <script type="module">modular()</script>
                <script type="">empty()</script>
                <style>a { color: red }</style>
                <style type="text/scss">$c: red;</style>
            </head><body></body></html>"#,
        );
        let extraction = extract(&doc, &InlineCompilerOptions::default());

        let resolved: Vec<Option<&str>> = extraction
            .regions
            .iter()
            .map(|r| r.resolved_mime_type())
            .collect();
        assert_eq!(
            resolved,
            vec![
                Some("text/javascript"),
                Some("text/typescript"),
                Some("text/javascript"),
                Some("text/javascript"),
                None,
                Some("text/scss"),
            ]
        );
    }

    #[test]
    fn test_near_empty_and_external_scripts_are_not_regions() {
        let doc = parse(
            "<html><head><script> </script><script>\n</script><script>x</script>\
             <script src=\"app.js\">ignored()</script><style>  </style></head><body></body></html>",
        );
        let extraction = extract(&doc, &InlineCompilerOptions::default());
        assert!(extraction.regions.is_empty());
        assert_eq!(extraction.links.len(), 1);
        assert_eq!(extraction.links[0].url, "app.js");
    }

    #[test]
    fn test_resource_reference_regions() {
        let doc = parse(
            "<html><head></head><body><x-require src=\" lib/a.js \"></x-require>\
             <x-require></x-require></body></html>",
        );
        let extraction = extract(&doc, &InlineCompilerOptions::default());

        let refs: Vec<Option<&str>> = extraction
            .resource_references()
            .map(|r| r.source_attribute.as_deref())
            .collect();
        assert_eq!(refs, vec![Some(" lib/a.js "), None]);
        assert_eq!(extraction.inline_regions().count(), 0);
    }

    #[test]
    fn test_style_default_option() {
        let doc = parse("<html><head><style>a { color: red }</style></head><body></body></html>");
        let options = InlineCompilerOptions {
            style_default_mime_type: Some("text/css".to_string()),
            ..Default::default()
        };
        let extraction = extract(&doc, &options);
        assert_eq!(extraction.regions[0].resolved_mime_type(), Some("text/css"));
        assert_eq!(extraction.regions[0].declared_mime_type, None);
    }
}
