//! Tests for the command handlers.

use super::*;
use crate::confirm::ConfirmPolicy;
use crate::session::Session;
use dosfs_types::error::DosError;
use dosfs_vfs::{
    Attributes, Clock, FatDate, FatTime, FormatOptions, FsKind, MemoryVolume, Volume, WriteMode,
};

const DEVICE: &str = "floppy.img";

fn volume() -> MemoryVolume {
    MemoryVolume::with_clock(Clock::Fixed(
        FatDate::from_ymd(2021, 3, 4),
        FatTime::from_hms(10, 20, 0),
    ))
}

fn touch(vol: &mut MemoryVolume, path: &str, data: &[u8]) {
    vol.write_file(path, data, WriteMode::CreateNew).unwrap();
}

/// Run `f` with a prompter that always gives `answer`; returns the result
/// and every question asked.
fn run<T>(
    vol: &mut MemoryVolume,
    answer: bool,
    f: impl FnOnce(&mut Session<'_>) -> T,
) -> (T, Vec<String>) {
    let mut questions = Vec::new();
    let mut prompter = |q: &str| {
        questions.push(q.to_string());
        answer
    };
    let result = {
        let mut session = Session::new(vol, &mut prompter, DEVICE);
        f(&mut session)
    };
    (result, questions)
}

fn names(vol: &mut MemoryVolume, dir: &str) -> Vec<String> {
    let mut handle = vol.open_dir(dir, "*").unwrap();
    let mut out = Vec::new();
    while let Some(e) = vol.read_dir(&mut handle).unwrap() {
        out.push(e.name);
    }
    vol.close_dir(handle);
    out
}

/// a/x.tmp, a/keep.txt, a/b/y.tmp, a/b/c/z.tmp
fn tmp_tree() -> MemoryVolume {
    let mut vol = volume();
    vol.mkdir("a").unwrap();
    vol.mkdir("a/b").unwrap();
    vol.mkdir("a/b/c").unwrap();
    touch(&mut vol, "a/x.tmp", b"x");
    touch(&mut vol, "a/keep.txt", b"k");
    touch(&mut vol, "a/b/y.tmp", b"y");
    touch(&mut vol, "a/b/c/z.tmp", b"z");
    vol
}

// ---------------------------------------------------------------------------
// dir
// ---------------------------------------------------------------------------

#[test]
fn dir_full_listing() {
    let mut vol = volume();
    vol.mkdir("games").unwrap();
    touch(&mut vol, "readme.txt", b"hello");
    let (listing, questions) = run(&mut vol, true, |s| list(s, ListOptions::default(), ""));
    let listing = listing.unwrap();
    assert!(questions.is_empty());
    assert_eq!(
        listing.lines,
        vec![
            " Volume has no label".to_string(),
            " Volume Serial Number is 5264-5280".to_string(),
            String::new(),
            " Directory of [floppy.img]:/".to_string(),
            String::new(),
            "03/04/2021 10:20 AM    <DIR>        0 games".to_string(),
            format!("03/04/2021 10:20 AM{}5 readme.txt", " ".repeat(17)),
            String::new(),
            "           1 File(s)            5 bytes".to_string(),
            "           1 Dir(s)       1473536 bytes free".to_string(),
        ]
    );
    assert_eq!(
        listing.totals,
        ListTotals {
            files: 1,
            dirs: 1,
            bytes: 5
        }
    );
}

#[test]
fn dir_shows_label() {
    let mut vol = volume();
    vol.format(&FormatOptions {
        label: Some("games".into()),
        ..FormatOptions::default()
    })
    .unwrap();
    let (listing, _) = run(&mut vol, true, |s| list(s, ListOptions::default(), ""));
    assert_eq!(listing.unwrap().lines[0], " Volume label: GAMES");
}

#[test]
fn dir_of_subdirectory_and_pattern() {
    let mut vol = tmp_tree();
    let (listing, _) = run(&mut vol, true, |s| list(s, ListOptions::default(), "/a/*.tmp"));
    let listing = listing.unwrap();
    assert!(listing.lines.contains(&" Directory of [floppy.img]:/a".to_string()));
    assert_eq!(listing.totals.files, 1);
    assert_eq!(listing.totals.dirs, 0);
}

#[test]
fn dir_counts_hidden_entries_but_shows_them_only_with_all() {
    let mut vol = volume();
    touch(&mut vol, "io.sys", b"boot");
    touch(&mut vol, "visible.txt", b"v");
    vol.set_attributes("io.sys", Attributes::HIDDEN | Attributes::SYSTEM, Attributes::empty())
        .unwrap();

    let (listing, _) = run(&mut vol, true, |s| list(s, ListOptions::default(), ""));
    let listing = listing.unwrap();
    assert_eq!(listing.totals.files, 2);
    assert!(!listing.to_string().contains("io.sys"));

    let opts = ListOptions {
        all: true,
        ..ListOptions::default()
    };
    let (listing, _) = run(&mut vol, true, |s| list(s, opts, ""));
    assert!(listing.unwrap().to_string().contains("io.sys"));
}

#[test]
fn dir_bare_prints_file_paths_only() {
    let mut vol = tmp_tree();
    let opts = ListOptions {
        bare: true,
        ..ListOptions::default()
    };
    let (listing, _) = run(&mut vol, true, |s| list(s, opts, "a"));
    let listing = listing.unwrap();
    assert_eq!(listing.lines, vec!["/a/x.tmp", "/a/keep.txt"]);
    assert_eq!(listing.totals, ListTotals::default());
}

#[test]
fn dir_bare_recursive() {
    let mut vol = tmp_tree();
    let opts = ListOptions {
        bare: true,
        recursive: true,
        ..ListOptions::default()
    };
    let (listing, _) = run(&mut vol, true, |s| list(s, opts, "a/*.tmp"));
    assert_eq!(
        listing.unwrap().lines,
        vec!["/a/x.tmp", "/a/b/y.tmp", "/a/b/c/z.tmp"]
    );
}

#[test]
fn dir_recursive_prints_a_header_per_directory() {
    let mut vol = tmp_tree();
    let opts = ListOptions {
        recursive: true,
        ..ListOptions::default()
    };
    let (listing, _) = run(&mut vol, true, |s| list(s, opts, "a/*.tmp"));
    let listing = listing.unwrap();
    let headers: Vec<&String> = listing
        .lines
        .iter()
        .filter(|l| l.starts_with(" Directory of"))
        .collect();
    assert_eq!(
        headers,
        vec![
            " Directory of [floppy.img]:/a",
            " Directory of [floppy.img]:/a/b",
            " Directory of [floppy.img]:/a/b/c",
        ]
    );
    assert_eq!(listing.totals.files, 3);
}

#[test]
fn dir_no_match_says_file_not_found() {
    let mut vol = tmp_tree();
    let (listing, _) = run(&mut vol, true, |s| list(s, ListOptions::default(), "a/*.zip"));
    let listing = listing.unwrap();
    assert!(listing.lines.contains(&"File not found".to_string()));
    assert_eq!(listing.totals, ListTotals::default());
}

#[test]
fn dir_missing_directory_is_an_error() {
    let mut vol = volume();
    let (result, _) = run(&mut vol, true, |s| list(s, ListOptions::default(), "nope/*"));
    assert!(matches!(result.unwrap_err().root(), DosError::NoPath));
}

#[test]
fn dir_short_names_column() {
    let mut vol = volume();
    touch(&mut vol, "Long file name.txt", b"");
    touch(&mut vol, "short.txt", b"");
    let opts = ListOptions {
        short_names: true,
        ..ListOptions::default()
    };
    let (listing, _) = run(&mut vol, true, |s| list(s, opts, ""));
    let text = listing.unwrap().to_string();
    assert!(text.contains("LONGFI~1.TXT Long file name.txt"));
    assert!(text.contains(&format!("{} short.txt", " ".repeat(12))));
}

// ---------------------------------------------------------------------------
// del
// ---------------------------------------------------------------------------

#[test]
fn delete_single_file_never_prompts() {
    let mut vol = tmp_tree();
    let (summary, questions) = run(&mut vol, false, |s| {
        delete(s, DeleteOptions::default(), &["a/keep.txt"])
    });
    assert_eq!(summary.unwrap().files, 1);
    assert!(questions.is_empty());
    assert!(matches!(vol.stat("a/keep.txt"), Err(DosError::NotFound)));
}

#[test]
fn delete_directory_asks_once_and_removes_the_subtree() {
    let mut vol = tmp_tree();
    let (summary, questions) = run(&mut vol, true, |s| {
        delete(s, DeleteOptions::default(), &["a/b"])
    });
    let summary = summary.unwrap();
    assert_eq!(questions, vec!["[floppy.img]:a/b, Delete entire subtree"]);
    assert_eq!(summary.dirs, 2);
    assert_eq!(summary.files, 2);
    assert!(matches!(vol.stat("a/b"), Err(DosError::NotFound)));
    assert!(matches!(vol.stat("a/b/c/z.tmp"), Err(DosError::NoPath)));
    assert_eq!(names(&mut vol, "a"), vec!["x.tmp", "keep.txt"]);
}

#[test]
fn declined_subtree_is_left_alone() {
    let mut vol = tmp_tree();
    let (summary, questions) = run(&mut vol, false, |s| {
        delete(s, DeleteOptions::default(), &["a"])
    });
    assert_eq!(summary.unwrap().skipped, 1);
    assert_eq!(questions.len(), 1);
    assert!(vol.stat("a/b/c/z.tmp").is_ok());
}

#[test]
fn recursive_delete_stays_out_of_a_declined_subtree() {
    let mut vol = volume();
    vol.mkdir("b").unwrap();
    touch(&mut vol, "b/inner.txt", b"i");
    let opts = DeleteOptions {
        recursive: true,
        ..DeleteOptions::default()
    };
    let (summary, questions) = run(&mut vol, false, |s| delete(s, opts, &["*"]));
    assert_eq!(summary.unwrap().skipped, 1);
    assert_eq!(questions, vec!["[floppy.img]:b, Delete entire subtree"]);
    assert!(vol.is_file("b/inner.txt"));
}

#[test]
fn recursive_delete_still_finds_matches_beside_a_declined_subtree() {
    let mut vol = tmp_tree();
    let opts = DeleteOptions {
        recursive: true,
        ..DeleteOptions::default()
    };
    let mut questions = Vec::new();
    let mut prompter = |q: &str| {
        questions.push(q.to_string());
        !q.ends_with("Delete entire subtree")
    };
    let summary = {
        let mut session = Session::new(&mut vol, &mut prompter, DEVICE);
        delete(&mut session, opts, &["a/*"]).unwrap()
    };
    assert_eq!(summary.files, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(
        questions,
        vec![
            "[floppy.img]:a/b, Delete entire subtree",
            "[floppy.img]:a/x.tmp, Delete",
            "[floppy.img]:a/keep.txt, Delete",
        ]
    );
    assert!(vol.is_file("a/b/y.tmp"));
    assert!(vol.is_file("a/b/c/z.tmp"));
}

#[test]
fn quiet_subtree_delete_does_not_ask() {
    let mut vol = tmp_tree();
    let opts = DeleteOptions {
        policy: ConfirmPolicy::Always,
        ..DeleteOptions::default()
    };
    let (summary, questions) = run(&mut vol, false, |s| delete(s, opts, &["/a"]));
    summary.unwrap();
    assert!(questions.is_empty());
    assert!(names(&mut vol, "").is_empty());
}

#[test]
fn interactive_mode_asks_for_single_files() {
    let mut vol = tmp_tree();
    let opts = DeleteOptions {
        policy: ConfirmPolicy::Prompt,
        ..DeleteOptions::default()
    };
    let (summary, questions) = run(&mut vol, false, |s| delete(s, opts, &["a/keep.txt"]));
    assert_eq!(summary.unwrap().skipped, 1);
    assert_eq!(questions, vec!["[floppy.img]:a/keep.txt, Delete"]);
    assert!(vol.stat("a/keep.txt").is_ok());
}

#[test]
fn wildcard_prompts_for_every_match_even_a_single_one() {
    let mut vol = tmp_tree();
    let (summary, questions) = run(&mut vol, true, |s| {
        delete(s, DeleteOptions::default(), &["a/*.txt"])
    });
    assert_eq!(summary.unwrap().files, 1);
    assert_eq!(questions, vec!["[floppy.img]:a/keep.txt, Delete"]);
}

#[test]
fn quiet_wildcard_does_not_ask() {
    let mut vol = tmp_tree();
    let opts = DeleteOptions {
        policy: ConfirmPolicy::Always,
        ..DeleteOptions::default()
    };
    let (summary, questions) = run(&mut vol, false, |s| delete(s, opts, &["a/*.tmp"]));
    assert_eq!(summary.unwrap().files, 1);
    assert!(questions.is_empty());
}

#[test]
fn wildcard_matching_a_directory_asks_about_the_subtree() {
    let mut vol = tmp_tree();
    let opts = DeleteOptions {
        policy: ConfirmPolicy::Always,
        ..DeleteOptions::default()
    };
    let (summary, _) = run(&mut vol, false, |s| delete(s, opts, &["a/*"]));
    let summary = summary.unwrap();
    assert_eq!(summary.dirs, 2);
    assert!(names(&mut vol, "a").is_empty());
}

#[test]
fn recursive_pattern_reaches_non_matching_subdirectories() {
    let mut vol = tmp_tree();
    let opts = DeleteOptions {
        policy: ConfirmPolicy::Always,
        recursive: true,
    };
    let (summary, _) = run(&mut vol, false, |s| delete(s, opts, &["a/*.tmp"]));
    assert_eq!(summary.unwrap().files, 3);
    assert!(vol.stat("a/x.tmp").is_err());
    assert!(vol.stat("a/b/y.tmp").is_err());
    assert!(vol.stat("a/b/c/z.tmp").is_err());
    assert!(vol.is_dir("a/b/c"));
    assert!(vol.is_file("a/keep.txt"));
}

#[test]
fn delete_stops_at_the_first_failing_argument() {
    let mut vol = volume();
    touch(&mut vol, "one.txt", b"");
    touch(&mut vol, "two.txt", b"");
    touch(&mut vol, "three.txt", b"");
    vol.set_attributes("two.txt", Attributes::READ_ONLY, Attributes::empty())
        .unwrap();
    let (result, _) = run(&mut vol, true, |s| {
        delete(s, DeleteOptions::default(), &["one.txt", "two.txt", "three.txt"])
    });
    let err = result.unwrap_err();
    assert_eq!(
        err.to_string(),
        "error while processing 'two.txt': Permission denied"
    );
    assert!(vol.stat("one.txt").is_err());
    assert!(vol.stat("two.txt").is_ok());
    assert!(vol.stat("three.txt").is_ok());
}

#[test]
fn failure_inside_a_subtree_names_the_entry() {
    let mut vol = tmp_tree();
    vol.set_attributes("a/b/y.tmp", Attributes::READ_ONLY, Attributes::empty())
        .unwrap();
    let (result, _) = run(&mut vol, true, |s| {
        delete(s, DeleteOptions::default(), &["a"])
    });
    let err = result.unwrap_err();
    assert_eq!(err.path(), Some("a/b/y.tmp"));
    assert!(matches!(err.root(), DosError::Denied));
    assert_eq!(vol.open_dirs(), 0);
}

#[test]
fn missing_concrete_path_is_not_found() {
    let mut vol = tmp_tree();
    let (result, _) = run(&mut vol, true, |s| {
        delete(s, DeleteOptions::default(), &["a/nothing.txt"])
    });
    assert!(matches!(result.unwrap_err().root(), DosError::NotFound));
}

#[test]
fn wildcard_without_matches_is_quiet() {
    let mut vol = tmp_tree();
    let (summary, questions) = run(&mut vol, true, |s| {
        delete(s, DeleteOptions::default(), &["a/*.zip"])
    });
    assert_eq!(summary.unwrap(), DeleteSummary::default());
    assert!(questions.is_empty());
}

#[test]
fn deleting_the_root_empties_the_volume() {
    let mut vol = tmp_tree();
    let (summary, questions) = run(&mut vol, true, |s| {
        delete(s, DeleteOptions::default(), &["/"])
    });
    summary.unwrap();
    assert_eq!(questions, vec!["[floppy.img]:, Delete entire subtree"]);
    assert!(names(&mut vol, "").is_empty());
    assert!(vol.is_dir(""));
}

#[test]
fn delete_without_arguments_is_usage_error() {
    let mut vol = volume();
    let (result, _) = run(&mut vol, true, |s| delete(s, DeleteOptions::default(), &[]));
    assert!(result.unwrap_err().is_usage());
}

// ---------------------------------------------------------------------------
// move
// ---------------------------------------------------------------------------

#[test]
fn move_into_directory_without_prompting() {
    let mut vol = tmp_tree();
    vol.mkdir("dst").unwrap();
    let (summary, questions) = run(&mut vol, false, |s| {
        move_entries(s, MoveOptions::default(), &["a/keep.txt"], "dst")
    });
    assert_eq!(summary.unwrap().moved, 1);
    assert!(questions.is_empty());
    assert!(vol.stat("a/keep.txt").is_err());
    assert_eq!(vol.read_file("dst/keep.txt").unwrap(), b"k");
}

#[test]
fn move_renames_a_single_file() {
    let mut vol = tmp_tree();
    let (summary, _) = run(&mut vol, false, |s| {
        move_entries(s, MoveOptions::default(), &["a/keep.txt"], "a/kept.txt")
    });
    summary.unwrap();
    assert_eq!(names(&mut vol, "a"), vec!["b", "x.tmp", "kept.txt"]);
}

#[test]
fn move_renames_a_directory_with_its_subtree() {
    let mut vol = tmp_tree();
    let (summary, _) = run(&mut vol, false, |s| {
        move_entries(s, MoveOptions::default(), &["a/b"], "a/renamed")
    });
    summary.unwrap();
    assert_eq!(vol.read_file("a/renamed/c/z.tmp").unwrap(), b"z");
}

#[test]
fn multiple_sources_need_a_directory_destination() {
    let mut vol = tmp_tree();
    let (result, _) = run(&mut vol, false, |s| {
        move_entries(s, MoveOptions::default(), &["a/x.tmp", "a/keep.txt"], "new.txt")
    });
    assert!(matches!(result.unwrap_err(), DosError::DestinationRequiresDirectory));
    assert!(vol.stat("a/x.tmp").is_ok());
}

#[test]
fn wildcard_source_needs_a_directory_destination() {
    let mut vol = tmp_tree();
    let (result, _) = run(&mut vol, false, |s| {
        move_entries(s, MoveOptions::default(), &["a/*.tmp"], "new.tmp")
    });
    let err = result.unwrap_err();
    assert!(err.is_usage());
    assert_eq!(
        err.to_string(),
        "Moving multiple files: Destination must be an existing directory"
    );
}

#[test]
fn wildcard_moves_every_match() {
    let mut vol = tmp_tree();
    vol.mkdir("dst").unwrap();
    touch(&mut vol, "a/w.tmp", b"w");
    let (summary, _) = run(&mut vol, false, |s| {
        move_entries(s, MoveOptions::default(), &["a/*.tmp"], "dst")
    });
    assert_eq!(summary.unwrap().moved, 2);
    assert_eq!(names(&mut vol, "dst"), vec!["x.tmp", "w.tmp"]);
    assert_eq!(names(&mut vol, "a"), vec!["b", "keep.txt"]);
}

#[test]
fn overwrite_prompts_by_default_and_decline_skips() {
    let mut vol = tmp_tree();
    touch(&mut vol, "keep.txt", b"old");
    let (summary, questions) = run(&mut vol, false, |s| {
        move_entries(s, MoveOptions::default(), &["a/keep.txt"], "")
    });
    assert_eq!(summary.unwrap().skipped, 1);
    assert_eq!(questions, vec!["[floppy.img]:keep.txt, File exists. Overwrite"]);
    assert_eq!(vol.read_file("keep.txt").unwrap(), b"old");
    assert!(vol.stat("a/keep.txt").is_ok());
}

#[test]
fn overwrite_accepted_replaces_the_file() {
    let mut vol = tmp_tree();
    touch(&mut vol, "keep.txt", b"old");
    let (summary, _) = run(&mut vol, true, |s| {
        move_entries(s, MoveOptions::default(), &["a/keep.txt"], "/")
    });
    assert_eq!(summary.unwrap().moved, 1);
    assert_eq!(vol.read_file("keep.txt").unwrap(), b"k");
}

#[test]
fn quiet_move_overwrites_silently() {
    let mut vol = tmp_tree();
    touch(&mut vol, "target.txt", b"old");
    let opts = MoveOptions {
        policy: ConfirmPolicy::Always,
    };
    let (summary, questions) = run(&mut vol, false, |s| {
        move_entries(s, opts, &["a/keep.txt"], "target.txt")
    });
    summary.unwrap();
    assert!(questions.is_empty());
    assert_eq!(vol.read_file("target.txt").unwrap(), b"k");
}

#[test]
fn failed_overwrite_of_read_only_target_is_fatal() {
    let mut vol = tmp_tree();
    touch(&mut vol, "target.txt", b"old");
    vol.set_attributes("target.txt", Attributes::READ_ONLY, Attributes::empty())
        .unwrap();
    let opts = MoveOptions {
        policy: ConfirmPolicy::Always,
    };
    let (result, _) = run(&mut vol, false, |s| {
        move_entries(s, opts, &["a/keep.txt"], "target.txt")
    });
    let err = result.unwrap_err();
    assert!(matches!(err.root(), DosError::Denied));
    assert_eq!(err.path(), Some("a/keep.txt"));
}

#[test]
fn moving_into_the_current_directory_is_a_no_op() {
    let mut vol = tmp_tree();
    let (summary, questions) = run(&mut vol, false, |s| {
        move_entries(s, MoveOptions::default(), &["a/*"], "a")
    });
    let summary = summary.unwrap();
    assert_eq!(summary.moved, 0);
    assert_eq!(summary.skipped, 3);
    assert!(questions.is_empty());
}

#[test]
fn wildcard_into_a_sibling_directory_skips_the_destination() {
    let mut vol = tmp_tree();
    let (summary, _) = run(&mut vol, false, |s| {
        move_entries(s, MoveOptions::default(), &["a/*"], "a/b")
    });
    let summary = summary.unwrap();
    assert_eq!(summary.moved, 2);
    assert_eq!(names(&mut vol, "a"), vec!["b"]);
    assert_eq!(names(&mut vol, "a/b"), vec!["c", "y.tmp", "x.tmp", "keep.txt"]);
}

#[test]
fn missing_source_is_not_found() {
    let mut vol = tmp_tree();
    let (result, _) = run(&mut vol, false, |s| {
        move_entries(s, MoveOptions::default(), &["a/ghost.txt"], "a/b")
    });
    let err = result.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().starts_with("error while processing 'a/ghost.txt'"));
}

// ---------------------------------------------------------------------------
// attrib
// ---------------------------------------------------------------------------

#[test]
fn attribute_letters_layout() {
    assert_eq!(attrib::attribute_letters(Attributes::empty()), "    ");
    assert_eq!(
        attrib::attribute_letters(Attributes::ARCHIVE | Attributes::HIDDEN),
        "A  H"
    );
    assert_eq!(
        attrib::attribute_letters(Attributes::READ_ONLY | Attributes::SYSTEM),
        " RS "
    );
}

#[test]
fn attrib_lists_files_only_by_default() {
    let mut vol = tmp_tree();
    let (report, _) = run(&mut vol, true, |s| {
        attrib(s, AttribOptions::default(), &["a/*"])
    });
    let report = report.unwrap();
    assert_eq!(report.processed, 2);
    assert_eq!(report.lines, vec!["A        /a/x.tmp", "A        /a/keep.txt"]);
}

#[test]
fn attrib_sets_and_clears_bits() {
    let mut vol = tmp_tree();
    let opts = AttribOptions {
        set: Attributes::HIDDEN | Attributes::READ_ONLY,
        clear: Attributes::ARCHIVE,
        ..AttribOptions::default()
    };
    let (report, _) = run(&mut vol, true, |s| attrib(s, opts, &["a/*.tmp"]));
    assert_eq!(report.unwrap().processed, 1);
    let attrs = vol.stat("a/x.tmp").unwrap().attributes;
    assert_eq!(attrs, Attributes::HIDDEN | Attributes::READ_ONLY);
    assert!(!vol.stat("a/b").unwrap().attributes.contains(Attributes::HIDDEN));
}

#[test]
fn attrib_directories_flag_includes_directories() {
    let mut vol = tmp_tree();
    let opts = AttribOptions {
        set: Attributes::HIDDEN,
        directories: true,
        ..AttribOptions::default()
    };
    let (report, _) = run(&mut vol, true, |s| attrib(s, opts, &["a/b"]));
    assert_eq!(report.unwrap().processed, 1);
    assert!(vol.stat("a/b").unwrap().is_hidden());
}

#[test]
fn attrib_recursive_reaches_every_level() {
    let mut vol = tmp_tree();
    let opts = AttribOptions {
        set: Attributes::READ_ONLY,
        recursive: true,
        ..AttribOptions::default()
    };
    let (report, _) = run(&mut vol, true, |s| attrib(s, opts, &["a/*.tmp"]));
    assert_eq!(report.unwrap().processed, 3);
    for path in ["a/x.tmp", "a/b/y.tmp", "a/b/c/z.tmp"] {
        assert!(vol.stat(path).unwrap().attributes.contains(Attributes::READ_ONLY));
    }
}

#[test]
fn attrib_with_nothing_processed_is_a_usage_error() {
    let mut vol = tmp_tree();
    let (result, _) = run(&mut vol, true, |s| {
        attrib(s, AttribOptions::default(), &["a/*.zip", "a/b"])
    });
    let err = result.unwrap_err();
    assert!(err.is_usage());
    assert_eq!(err.to_string(), "File not found");
}

// ---------------------------------------------------------------------------
// mkdir / format
// ---------------------------------------------------------------------------

#[test]
fn mkdir_plain_needs_parent() {
    let mut vol = volume();
    let err = make_dir(&mut vol, "x/y", false).unwrap_err();
    assert!(matches!(err.root(), DosError::NoPath));
    assert_eq!(err.path(), Some("x/y"));
}

#[test]
fn mkdir_with_parents() {
    let mut vol = volume();
    make_dir(&mut vol, "/x/y/z", true).unwrap();
    assert!(vol.is_dir("x/y/z"));
    make_dir(&mut vol, "x\\y", true).unwrap();
    assert!(matches!(
        make_dir(&mut vol, "x/y", false).unwrap_err().root(),
        DosError::Exists
    ));
}

#[test]
fn format_always_asks() {
    let mut vol = tmp_tree();
    let opts = FormatOptions {
        fs: FsKind::Fat,
        label: Some("blank".into()),
        ..FormatOptions::default()
    };
    let (done, questions) = run(&mut vol, false, |s| format(s, &opts));
    assert!(!done.unwrap());
    assert_eq!(questions, vec!["Erase everything in [floppy.img]"]);
    assert!(vol.is_dir("a"));

    let (done, _) = run(&mut vol, true, |s| format(s, &opts));
    assert!(done.unwrap());
    assert!(names(&mut vol, "").is_empty());
    assert_eq!(vol.label().unwrap().label, "BLANK");
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

mod prop {
    use super::*;
    use proptest::prelude::*;

    fn build(files: &[(u8, String, usize)]) -> MemoryVolume {
        let mut vol = volume();
        for dir in ["d0", "d1", "d1/d2"] {
            vol.mkdir(dir).unwrap();
        }
        for (dir, name, size) in files {
            let dir = ["", "d0", "d1", "d1/d2"][usize::from(*dir) % 4];
            let path = crate::path::join(dir, name);
            if vol.stat(&path).is_err() {
                vol.write_file(&path, &vec![0u8; *size], WriteMode::CreateNew)
                    .unwrap();
            }
        }
        vol
    }

    proptest! {
        #[test]
        fn listing_twice_gives_the_same_result(
            files in proptest::collection::vec(
                (any::<u8>(), "[a-z]{1,8}\\.[a-z]{0,3}", 0usize..3000),
                0..20,
            ),
            recursive in any::<bool>(),
        ) {
            let mut vol = build(&files);
            let opts = ListOptions { recursive, ..ListOptions::default() };
            let (first, _) = run(&mut vol, true, |s| list(s, opts, ""));
            let (second, _) = run(&mut vol, true, |s| list(s, opts, ""));
            let (first, second) = (first.unwrap(), second.unwrap());
            prop_assert_eq!(first.totals, second.totals);
            prop_assert_eq!(first.lines, second.lines);
        }

        #[test]
        fn confirmed_subtree_delete_leaves_nothing(
            files in proptest::collection::vec((any::<u8>(), "[a-z]{1,8}", 0usize..100), 0..20),
        ) {
            let mut vol = build(&files);
            let (result, questions) = run(&mut vol, true, |s| {
                delete(s, DeleteOptions::default(), &["d1"])
            });
            result.unwrap();
            prop_assert_eq!(questions.len(), 1);
            prop_assert!(matches!(vol.stat("d1"), Err(DosError::NotFound)));
            prop_assert!(vol.stat("d1/d2").is_err());
        }
    }
}
