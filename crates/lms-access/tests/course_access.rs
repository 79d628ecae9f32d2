//! # Course Access Integration Tests
//!
//! Loads a course document from disk and walks it the way the LMS does:
//! merged rules per block, visibility for each cohort, and validation of
//! references to deleted groups.

use std::io::Write;

use lms_access::{
    is_visible_to_group, validate_course, CourseDocument, CourseTree, GroupAccess, IssueKind,
    MergedAccessCache,
};
use lms_core::{BlockId, GroupId, PartitionId};

const COURSE: &str = r#"
course_id: MITx/6.002x/2024_Fall
user_partitions:
  - id: 50
    name: Cohorts
    scheme: cohort
    groups:
      - {id: 1, name: Alpha}
      - {id: 2, name: Beta}
      - {id: 3, name: Gamma}
  - id: 60
    name: Video experiment
    scheme: random
    groups:
      - {id: 0, name: Control}
      - {id: 1, name: Treatment}
root:
  id: course
  category: course
  display_name: Circuits and Electronics
  children:
    - id: week1
      category: chapter
      group_access: {50: [1, 2]}
      children:
        - id: lecture1
          category: sequential
          group_access: {50: [2, 3], 60: [1]}
          children:
            - id: video1
              category: video
        - id: lab1
          category: sequential
          group_access: {50: [3]}
    - id: week2
      category: chapter
      children:
        - id: retired
          category: html
          group_access: {50: [9], 77: [1]}
"#;

fn id(s: &str) -> BlockId {
    BlockId::new(s).unwrap()
}

fn load() -> CourseTree {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(COURSE.as_bytes()).unwrap();
    CourseDocument::load(file.path()).unwrap().into_tree().unwrap()
}

#[test]
fn merged_rules_narrow_down_the_tree() {
    let tree = load();
    let video = tree.merged_access(&id("video1"));
    assert_eq!(
        video.get(&PartitionId(50)).and_then(GroupAccess::groups).map(|g| g.len()),
        Some(1)
    );
    assert!(video.allows(PartitionId(50), GroupId(2)));
    assert!(video.allows(PartitionId(60), GroupId(1)));
    assert!(!video.allows(PartitionId(60), GroupId(0)));

    let lab = tree.merged_access(&id("lab1"));
    assert_eq!(lab.get(&PartitionId(50)), Some(&GroupAccess::DenyAll));
}

#[test]
fn visibility_per_cohort() {
    let tree = load();
    let cohorts = &tree.user_partitions()[0];
    let visible: Vec<&str> = cohorts
        .groups
        .iter()
        .filter(|group| is_visible_to_group(&tree.merged_access(&id("video1")), cohorts, group))
        .map(|group| group.name.as_str())
        .collect();
    assert_eq!(visible, vec!["Beta"]);

    let week2 = tree.merged_access(&id("week2"));
    assert!(cohorts
        .groups
        .iter()
        .all(|group| is_visible_to_group(&week2, cohorts, group)));
}

#[test]
fn validation_reports_deleted_groups_and_partitions() {
    let tree = load();
    let results = validate_course(&tree);
    let invalid: Vec<_> = results.iter().filter(|r| !r.is_valid()).collect();
    assert_eq!(invalid.len(), 1);
    assert_eq!(invalid[0].block, id("retired"));
    let kinds: Vec<&IssueKind> = invalid[0].errors().map(|issue| &issue.kind).collect();
    assert_eq!(
        kinds,
        vec![
            &IssueKind::MissingGroup {
                partition: PartitionId(50),
                group: GroupId(9)
            },
            &IssueKind::MissingPartition {
                partition: PartitionId(77)
            },
        ]
    );
}

#[test]
fn cache_tracks_author_edits() {
    let mut tree = load();
    let mut cache = MergedAccessCache::new();
    let before = cache.get_or_compute(&tree, &id("video1"));
    assert!(before.allows(PartitionId(50), GroupId(2)));

    let mut edited = tree.get(&id("week1")).unwrap().group_access().clone();
    edited.insert(PartitionId(50), GroupAccess::from_groups([GroupId(3)]));
    let stale = tree.set_local_access(&id("week1"), edited).unwrap();
    assert_eq!(stale.len(), 4);
    assert_eq!(cache.invalidate_subtree(&tree, &id("week1")), 3);
    assert!(cache.get(&id("course")).is_some());

    let after = cache.get_or_compute(&tree, &id("video1"));
    assert!(!after.allows(PartitionId(50), GroupId(2)));
    assert!(after.allows(PartitionId(50), GroupId(3)));
    assert_eq!(after, tree.merged_access(&id("video1")));
}
