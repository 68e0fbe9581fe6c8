// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Trailmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rstest::{fixture, rstest};

use super::{write_temp_file, ProgressFile, StoreError, WriteDurability};
use crate::model::ProgressStatus;
use crate::progress::{update, ProgressStore};
use crate::store::ProgressSink;

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: std::path::PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!("trailmap-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

struct ProgressFileTestCtx {
    tmp: TempDir,
    file: ProgressFile,
}

impl ProgressFileTestCtx {
    fn new(prefix: &str) -> Self {
        let tmp = TempDir::new(prefix);
        let file = ProgressFile::new(tmp.path().join("data").join("progress.json"));
        Self { tmp, file }
    }
}

#[fixture]
fn ctx() -> ProgressFileTestCtx {
    ProgressFileTestCtx::new("progress-file")
}

fn sample_store() -> ProgressStore {
    let store = update(ProgressStore::new(), "r1", "a", ProgressStatus::Completed);
    update(store, "r1", "b", ProgressStatus::Learning)
}

fn data_dir_names(ctx: &ProgressFileTestCtx) -> Vec<String> {
    let mut names = std::fs::read_dir(ctx.tmp.path().join("data"))
        .expect("read dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    names.sort();
    names
}

#[rstest]
fn missing_file_reads_as_none(ctx: ProgressFileTestCtx) {
    assert!(ctx.file.read_blob().expect("read").is_none());
    assert!(ctx.file.read_blob_or_none().is_none());
}

#[rstest]
fn save_creates_parent_dirs_and_round_trips(ctx: ProgressFileTestCtx) {
    let store = sample_store();
    ctx.file.save(&store).expect("save");

    let raw = ctx.file.read_blob().expect("read").expect("blob present");
    assert_eq!(ProgressStore::load(Some(raw.as_str())), store);
}

#[rstest]
#[case::best_effort(WriteDurability::BestEffort)]
#[case::durable(WriteDurability::Durable)]
fn save_overwrites_previous_blob(ctx: ProgressFileTestCtx, #[case] durability: WriteDurability) {
    let mut file = ctx.file.clone().with_durability(durability);
    file.persist(&sample_store()).expect("first save");

    let next = update(sample_store(), "r1", "a", ProgressStatus::Skipped);
    file.persist(&next).expect("second save");

    let raw = file.read_blob().expect("read").expect("blob present");
    let reloaded = ProgressStore::load(Some(raw.as_str()));
    assert_eq!(reloaded.get("r1", "a"), Some(ProgressStatus::Skipped));
}

#[rstest]
fn save_leaves_no_temp_files_behind(ctx: ProgressFileTestCtx) {
    ctx.file.save(&sample_store()).expect("save");
    assert_eq!(data_dir_names(&ctx), ["progress.json"]);
}

#[rstest]
fn unreadable_path_is_treated_as_missing(ctx: ProgressFileTestCtx) {
    // A directory at the blob path cannot be read as a file.
    std::fs::create_dir_all(ctx.file.path()).expect("mkdir");

    assert!(matches!(ctx.file.read_blob(), Err(StoreError::Io { .. })));
    assert!(ctx.file.read_blob_or_none().is_none());
}

#[rstest]
fn write_failure_is_reported(ctx: ProgressFileTestCtx) {
    std::fs::create_dir_all(ctx.file.path()).expect("mkdir");

    let err = ctx.file.save(&sample_store()).unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }), "unexpected error: {err}");
    assert_eq!(data_dir_names(&ctx), ["progress.json"]);
}

#[rstest]
fn failed_fill_removes_the_temp_file(ctx: ProgressFileTestCtx) {
    let dir = ctx.tmp.path().join("data");
    std::fs::create_dir_all(&dir).expect("mkdir");
    let tmp_path = dir.join(".trailmap.tmp.progress.json.1");

    // Stands in for an fsync that fails after the contents were written.
    let err = write_temp_file(&tmp_path, |file| {
        std::io::Write::write_all(file, b"{}")?;
        Err(std::io::Error::other("sync failed"))
    })
    .unwrap_err();

    assert!(matches!(err, StoreError::Io { .. }), "unexpected error: {err}");
    assert!(!tmp_path.exists());
    assert!(data_dir_names(&ctx).is_empty());
}

#[cfg(unix)]
#[rstest]
fn save_refuses_to_follow_symlinks(ctx: ProgressFileTestCtx) {
    let target = ctx.tmp.path().join("elsewhere.json");
    std::fs::write(&target, "{}").expect("write target");
    std::fs::create_dir_all(ctx.tmp.path().join("data")).expect("mkdir");
    std::os::unix::fs::symlink(&target, ctx.file.path()).expect("symlink");

    let err = ctx.file.save(&sample_store()).unwrap_err();
    assert!(matches!(err, StoreError::SymlinkRefused { .. }));
    assert_eq!(std::fs::read_to_string(&target).expect("read target"), "{}");
}
