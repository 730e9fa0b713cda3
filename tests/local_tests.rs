//! Local-filesystem drops: both protocols over real trees.

use dropwalk::pipeline::{NoImages, ingest, ingest_report};
use dropwalk::source::{LocalDrop, Protocol};
use dropwalk::{DropOpts, FileMeta, ObjectUrls, Revoker, harvest_drop};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// `proj/{readme.md, src/{lib.rs, logo.png}, .DS_Store}`
fn sample_tree(root: &Path) -> std::path::PathBuf {
    let proj = root.join("proj");
    write(&proj.join("readme.md"), "# proj");
    write(&proj.join("src/lib.rs"), "pub fn f() {}");
    write(&proj.join("src/logo.png"), "png");
    write(&proj.join(".DS_Store"), "junk");
    proj
}

fn sorted_paths(files: &[dropwalk::HarvestedFile]) -> Vec<String> {
    let mut paths: Vec<String> = files.iter().map(|f| f.full_path.clone()).collect();
    paths.sort();
    paths
}

#[tokio::test]
async fn test_legacy_paths_are_relative_to_drop() {
    let tmp = tempfile::tempdir().unwrap();
    let proj = sample_tree(tmp.path());
    let items = [LocalDrop::from_path(&proj, Protocol::Legacy)
        .await
        .unwrap()
        .with_page_size(1)];
    let opts = DropOpts {
        skip_os_junk: true,
        ..Default::default()
    };
    let files = ingest(&items, &opts).await.unwrap();
    assert_eq!(
        sorted_paths(&files),
        vec!["proj/readme.md", "proj/src/lib.rs", "proj/src/logo.png"]
    );
}

#[tokio::test]
async fn test_handle_paths_are_names() {
    let tmp = tempfile::tempdir().unwrap();
    let proj = sample_tree(tmp.path());
    let items = [LocalDrop::from_path(&proj, Protocol::Auto).await.unwrap()];
    let (files, report) = ingest_report(&items, &DropOpts::default()).await.unwrap();
    assert_eq!(report.items[0].via, Some(Protocol::Handle));
    assert_eq!(
        sorted_paths(&files),
        vec![".DS_Store", "lib.rs", "logo.png", "readme.md"]
    );
}

#[tokio::test]
async fn test_raw_protocol_file_and_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let proj = sample_tree(tmp.path());
    let items = [
        LocalDrop::from_path(&proj.join("readme.md"), Protocol::Raw).await.unwrap(),
        LocalDrop::from_path(&proj, Protocol::Raw).await.unwrap(),
    ];
    let (files, report) = ingest_report(&items, &DropOpts::default()).await.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].full_path, "readme.md");
    assert_eq!(files[0].content_kind, "text/markdown");
    assert_eq!(files[0].size, 6);
    assert_eq!(report.items[1].via, None);
}

#[tokio::test]
async fn test_local_budget() {
    let tmp = tempfile::tempdir().unwrap();
    for i in 0..12 {
        write(&tmp.path().join(format!("many/f{i:02}.txt")), "x");
    }
    write(&tmp.path().join("later.txt"), "y");
    for protocol in [Protocol::Legacy, Protocol::Handle] {
        let items = [
            LocalDrop::from_path(&tmp.path().join("many"), protocol)
                .await
                .unwrap()
                .with_page_size(5),
            LocalDrop::from_path(&tmp.path().join("later.txt"), protocol).await.unwrap(),
        ];
        let opts = DropOpts {
            max_files: 10,
            ..Default::default()
        };
        let (files, report) = ingest_report(&items, &opts).await.unwrap();
        assert_eq!(files.len(), 10);
        assert_eq!(report.items_skipped, 1);
    }
}

#[tokio::test]
async fn test_harvest_drop_end_to_end() {
    let tmp = tempfile::tempdir().unwrap();
    let proj = sample_tree(tmp.path());
    write(&tmp.path().join("a.txt"), "first");
    let items = [
        LocalDrop::from_path(&tmp.path().join("a.txt"), Protocol::Legacy).await.unwrap(),
        LocalDrop::from_path(&proj, Protocol::Legacy).await.unwrap(),
    ];
    let opts = DropOpts {
        skip_os_junk: true,
        ..Default::default()
    };
    let urls = ObjectUrls::new();
    let mut texts = Vec::new();
    let mut images = Vec::new();
    let (_, summary) = harvest_drop(
        &items,
        &opts,
        |text, meta: &FileMeta| {
            texts.push((meta.full_path.clone(), text));
            Ok(())
        },
        Some(|name: &str, url: String, revoker: Revoker| {
            images.push((name.to_string(), url));
            revoker.revoke();
            Ok(())
        }),
        &urls,
    )
    .await
    .unwrap();

    assert_eq!(summary.text, 3);
    assert_eq!(summary.images, 1);
    assert_eq!(texts[0], ("a.txt".to_string(), "first".to_string()));
    // Breadth-first: the top-level readme precedes anything under src/.
    assert_eq!(texts[1].0, "proj/readme.md");
    assert_eq!(texts[2], ("proj/src/lib.rs".to_string(), "pub fn f() {}".to_string()));
    assert_eq!(images[0].0, "logo.png");
    assert_eq!(urls.live(), 0);
}

#[tokio::test]
async fn test_missing_path_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(LocalDrop::from_path(&tmp.path().join("nope"), Protocol::Auto).await.is_err());
}

#[tokio::test]
async fn test_deleted_file_fails_dispatch() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("gone.txt");
    write(&path, "soon gone");
    let items = [LocalDrop::from_path(&path, Protocol::Raw).await.unwrap()];
    let files = ingest(&items, &DropOpts::default()).await.unwrap();
    fs::remove_file(&path).unwrap();
    let result = dropwalk::pipeline::dispatch(
        files,
        |_, _: &FileMeta| Ok(()),
        None::<NoImages>,
        &ObjectUrls::new(),
    )
    .await;
    assert!(result.is_err());
}

// --- symlinks ---

#[cfg(unix)]
fn sorted_names(files: &[dropwalk::HarvestedFile]) -> Vec<String> {
    let mut names: Vec<String> = files.iter().map(|f| f.name.clone()).collect();
    names.sort();
    names
}

#[cfg(unix)]
#[tokio::test]
async fn test_self_links_do_not_repeat_files() {
    use std::os::unix::fs::symlink;
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("root");
    write(&root.join("a.txt"), "a");
    symlink(&root, root.join("loop")).unwrap();
    symlink(&root, root.join("again")).unwrap();

    for follow in [false, true] {
        for protocol in [Protocol::Legacy, Protocol::Handle] {
            let items = [LocalDrop::from_path(&root, protocol)
                .await
                .unwrap()
                .with_follow_links(follow)];
            let (files, report) = ingest_report(&items, &DropOpts::default()).await.unwrap();
            assert_eq!(files.len(), 1, "{protocol:?} follow={follow}");
            assert_eq!(files[0].name, "a.txt");
            assert!(report.skipped_subtrees.is_empty());
        }
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_directory_links_followed_only_on_request() {
    use std::os::unix::fs::symlink;
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("root");
    let outside = tmp.path().join("outside");
    write(&root.join("real/b.txt"), "b");
    write(&outside.join("c.txt"), "c");
    symlink(root.join("real"), root.join("alias")).unwrap();
    symlink(&outside, root.join("ext")).unwrap();
    symlink(outside.join("c.txt"), root.join("note.txt")).unwrap();

    for protocol in [Protocol::Legacy, Protocol::Handle] {
        let items = [LocalDrop::from_path(&root, protocol).await.unwrap()];
        let files = ingest(&items, &DropOpts::default()).await.unwrap();
        assert_eq!(sorted_names(&files), vec!["b.txt", "note.txt"], "{protocol:?}");

        let items = [LocalDrop::from_path(&root, protocol)
            .await
            .unwrap()
            .with_follow_links(true)];
        let files = ingest(&items, &DropOpts::default()).await.unwrap();
        assert_eq!(
            sorted_names(&files),
            vec!["b.txt", "c.txt", "note.txt"],
            "{protocol:?}"
        );
    }
}

#[tokio::test]
async fn test_raw_size_is_taken_at_drop_time() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("grow.txt");
    write(&path, "abc");
    let items = [LocalDrop::from_path(&path, Protocol::Raw).await.unwrap()];
    write(&path, "abcdef");
    let files = ingest(&items, &DropOpts::default()).await.unwrap();
    assert_eq!(files[0].size, 3);
}
