
use quire::themes::ThemeMode;
use quire::{ConfigError, Error, Site};
use test_utils::{SITE_TOML, tree, write};

#[test]
fn test_load_site_and_manifest() {
    let dir = tree(&[
        ("site.toml", SITE_TOML),
        (
            "src/content/posts/hello.md",
            "---\ntitle: Hello\npublished: 2024-01-01\n---\n\n## Part one\n\n## Part one\n",
        ),
    ]);
    let root = dir.path();

    let site = Site::load(&root.join("site.toml"), &root.join("src/content/posts")).unwrap();
    assert_eq!(site.config().themes().mode(), ThemeMode::Select);
    assert_eq!(site.posts().len(), 1);
    assert!(site.collection("posts").is_some());
    assert!(site.collection("pages").is_none());

    let json: serde_json::Value =
        serde_json::from_str(&site.manifest().to_json(false).unwrap()).unwrap();
    assert_eq!(json["site"]["title"], "twistezo");
    assert_eq!(json["site"]["pageSize"], 15);

    let hello = &json["collections"]["posts"][0];
    assert_eq!(hello["id"], "hello");
    assert_eq!(hello["data"]["title"], "Hello");
    assert_eq!(hello["data"]["published"], "2024-01-01T00:00:00Z");
    assert_eq!(hello["data"]["tags"], serde_json::json!([]));
    assert_eq!(hello["data"]["toc"], true);
    assert!(hello["data"].get("description").is_none());
    assert_eq!(hello["headings"][1]["slug"], "part-one-1");
}

#[test]
fn test_invalid_config_fails_before_content() {
    let src = SITE_TOML.replace("default = \"catppuccin-macchiato\"", "default = \"auto\"");
    let dir = tree(&[("site.toml", src.as_str())]);
    let root = dir.path();
    // broken content that would fail too, but is never reached
    write(root, "posts/bad.md", "no frontmatter");

    let err = Site::load(&root.join("site.toml"), &root.join("posts")).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::AutoOutsideLightDarkAuto)));
}

#[test]
fn test_light_dark_auto_site() {
    let src = SITE_TOML
        .replace("mode = \"select\"", "mode = \"light-dark-auto\"")
        .replace("default = \"catppuccin-macchiato\"", "default = \"auto\"")
        .replace(
            "include = [\"catppuccin-latte\", \"catppuccin-macchiato\", \"dracula\"]",
            "include = [\"github-light\", \"github-dark\"]",
        );
    let dir = tree(&[("site.toml", src.as_str())]);
    let root = dir.path();

    let site = Site::load(&root.join("site.toml"), &root.join("posts")).unwrap();
    assert_eq!(
        site.config().themes().light_dark(),
        Some(("github-light", "github-dark"))
    );
    assert!(site.posts().is_empty());
}

#[test]
fn test_missing_config_file() {
    let dir = tree(&[]);
    let err = Site::load(&dir.path().join("site.toml"), dir.path()).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn test_bundled_starter_site_is_valid() {
    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/default_site");
    let site = Site::load(&root.join("site.toml"), &root.join("src/content/posts")).unwrap();
    let hello = site.posts().get("hello-world").unwrap();
    assert_eq!(hello.data.tags, vec!["meta"]);
    assert_eq!(hello.headings().len(), 2);
}
