#![cfg(unix)]
#![allow(clippy::expect_used, clippy::unwrap_used)]
//! Symlink reconciliation against a real filesystem.

use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

use dotfyles::operations::SystemFileSystemOps;
use dotfyles::resources::symlink::{LinkSpec, Reconciliation, reconcile};

struct Dirs {
    _tmp: tempfile::TempDir,
    home: PathBuf,
    repo: PathBuf,
}

fn dirs() -> Dirs {
    let tmp = tempfile::tempdir().unwrap();
    let home = tmp.path().join("home");
    let repo = tmp.path().join("repo");
    std::fs::create_dir_all(&home).unwrap();
    std::fs::create_dir_all(repo.join("config")).unwrap();
    std::fs::write(repo.join("config/starship.toml"), "add_newline = false\n").unwrap();
    Dirs {
        _tmp: tmp,
        home,
        repo,
    }
}

fn link_inode(path: &Path) -> u64 {
    std::fs::symlink_metadata(path).unwrap().ino()
}

#[test]
fn second_reconcile_leaves_existing_link_in_place() {
    let d = dirs();
    let spec = LinkSpec::new("config/starship.toml", "~/.config/starship.toml");
    let target = d.home.join(".config/starship.toml");

    let first = reconcile(&spec, &d.home, &d.repo, &SystemFileSystemOps).unwrap();
    assert_eq!(first, Reconciliation::Linked(target.clone()));
    let inode = link_inode(&target);

    let second = reconcile(&spec, &d.home, &d.repo, &SystemFileSystemOps).unwrap();
    assert_eq!(second, first);
    assert_eq!(link_inode(&target), inode);
    assert_eq!(
        std::fs::read_link(&target).unwrap(),
        d.repo.join("config/starship.toml")
    );
}

#[test]
fn link_to_another_file_is_repointed() {
    let d = dirs();
    std::fs::write(d.repo.join("other.toml"), "").unwrap();
    std::os::unix::fs::symlink(d.repo.join("other.toml"), d.home.join("starship.toml")).unwrap();

    let spec = LinkSpec::to_home("config/starship.toml");
    reconcile(&spec, &d.home, &d.repo, &SystemFileSystemOps).unwrap();

    assert_eq!(
        std::fs::read_link(d.home.join("starship.toml")).unwrap(),
        d.repo.join("config/starship.toml")
    );
    assert!(d.repo.join("other.toml").exists());
}

#[test]
fn dangling_link_is_repointed() {
    let d = dirs();
    std::os::unix::fs::symlink(d.repo.join("gone.toml"), d.home.join("starship.toml")).unwrap();

    let spec = LinkSpec::to_home("config/starship.toml");
    reconcile(&spec, &d.home, &d.repo, &SystemFileSystemOps).unwrap();

    assert_eq!(
        std::fs::read_to_string(d.home.join("starship.toml")).unwrap(),
        "add_newline = false\n"
    );
}

#[test]
fn missing_source_leaves_destination_untouched() {
    let d = dirs();
    std::fs::write(d.home.join(".vimrc"), "set number\n").unwrap();

    let spec = LinkSpec::to_home("vim/.vimrc");
    let outcome = reconcile(&spec, &d.home, &d.repo, &SystemFileSystemOps).unwrap();

    assert_eq!(outcome, Reconciliation::Skipped);
    assert_eq!(
        std::fs::read_to_string(d.home.join(".vimrc")).unwrap(),
        "set number\n"
    );
}

#[test]
fn real_directory_is_never_replaced() {
    let d = dirs();
    std::fs::create_dir_all(d.home.join("starship.toml/keep")).unwrap();

    let spec = LinkSpec::to_home("config/starship.toml");
    let err = reconcile(&spec, &d.home, &d.repo, &SystemFileSystemOps).unwrap_err();

    assert!(err.to_string().contains("refusing to replace directory"));
    assert!(d.home.join("starship.toml/keep").is_dir());
}

#[test]
fn destination_equal_to_source_keeps_its_content() {
    let d = dirs();
    std::fs::write(d.home.join(".zshrc"), "precious\n").unwrap();

    let spec = LinkSpec::to_home("~/.zshrc");
    let outcome = reconcile(&spec, &d.home, &d.home, &SystemFileSystemOps).unwrap();

    let zshrc = d.home.join(".zshrc");
    assert_eq!(outcome, Reconciliation::Linked(zshrc.clone()));
    assert!(!zshrc.is_symlink());
    assert_eq!(std::fs::read_to_string(&zshrc).unwrap(), "precious\n");
}

#[test]
fn destination_under_linked_parent_keeps_the_source() {
    let d = dirs();
    std::os::unix::fs::symlink(&d.repo, d.home.join("alias")).unwrap();

    let spec = LinkSpec::new("config/starship.toml", "~/alias/config/starship.toml");
    reconcile(&spec, &d.home, &d.repo, &SystemFileSystemOps).unwrap();

    let source = d.repo.join("config/starship.toml");
    assert!(!source.is_symlink());
    assert_eq!(
        std::fs::read_to_string(source).unwrap(),
        "add_newline = false\n"
    );
}
