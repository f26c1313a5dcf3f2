//! Incremental decisions across runs: idempotence, global triggers, linked
//! content and state file handling.

use resforge_common::ResourceFormat;
use resforge_conformance::{age, build, inputs, mtime, resx_strings, touch_ahead, Fixture};
use resforge_formats::read_file;

#[test]
fn second_run_converts_nothing() {
    let fx = Fixture::new().unwrap();
    let a = fx.write("A.resx", resx_strings(&[("Title", "Main")])).unwrap();
    let b = fx.write("B.txt", "Greeting=Hello\n").unwrap();
    age(&a, 100).unwrap();
    age(&b, 100).unwrap();
    let task = inputs(&[a, b]);

    let first = build(&task, Some(&fx.state_file()));
    let stamps = [mtime(&fx.path("A.resources")), mtime(&fx.path("B.resources"))];

    let second = build(&task, Some(&fx.state_file()));

    assert!(second.result.success);
    assert_eq!(second.result, first.result);
    assert_eq!(
        [mtime(&fx.path("A.resources")), mtime(&fx.path("B.resources"))],
        stamps
    );
    assert!(second.diagnostics.is_empty());
}

#[test]
fn touched_source_and_deleted_output_rebuild_only_that_source() {
    let fx = Fixture::new().unwrap();
    let a = fx.write("A.txt", "a=1\n").unwrap();
    let b = fx.write("B.txt", "b=2\n").unwrap();
    let c = fx.write("C.txt", "c=3\n").unwrap();
    for p in [&a, &b, &c] {
        age(p, 100).unwrap();
    }
    let task = inputs(&[a.clone(), b, c]);
    build(&task, Some(&fx.state_file()));
    let b_before = mtime(&fx.path("B.resources"));

    fx.write("A.txt", "a=changed\n").unwrap();
    touch_ahead(&a, 5).unwrap();
    std::fs::remove_file(fx.path("C.resources")).unwrap();

    let run = build(&task, Some(&fx.state_file()));

    assert!(run.result.success);
    assert_eq!(run.output_paths().len(), 3);
    assert_eq!(mtime(&fx.path("B.resources")), b_before);
    assert!(fx.path("C.resources").is_file());
    let compiled = read_file(&fx.path("A.resources"), ResourceFormat::Binary, &[]).unwrap();
    assert_eq!(compiled.set.get("a").unwrap().value.as_str(), Some("changed"));
}

#[test]
fn newer_additional_input_rebuilds_everything() {
    let fx = Fixture::new().unwrap();
    let a = fx.write("A.txt", "a=1\n").unwrap();
    let b = fx.write("B.resx", resx_strings(&[("b", "2")])).unwrap();
    let props = fx.write("build.props", "v1").unwrap();
    for p in [&a, &b, &props] {
        age(p, 100).unwrap();
    }
    let mut task = inputs(&[a, b]);
    task.additional_inputs = vec![props.clone()];
    build(&task, Some(&fx.state_file()));
    let before = [mtime(&fx.path("A.resources")), mtime(&fx.path("B.resources"))];

    touch_ahead(&props, 60).unwrap();
    let run = build(&task, Some(&fx.state_file()));

    assert!(run.result.success);
    assert_ne!(mtime(&fx.path("A.resources")), before[0]);
    assert_ne!(mtime(&fx.path("B.resources")), before[1]);
}

#[test]
fn changed_additional_input_set_rebuilds_everything() {
    let fx = Fixture::new().unwrap();
    let a = fx.write("A.txt", "a=1\n").unwrap();
    let extra = fx.write("extra.props", "x").unwrap();
    age(&a, 100).unwrap();
    age(&extra, 200).unwrap();
    let mut task = inputs(&[a]);
    build(&task, Some(&fx.state_file()));
    let before = mtime(&fx.path("A.resources"));

    task.additional_inputs.push(extra);
    build(&task, Some(&fx.state_file()));

    assert_ne!(mtime(&fx.path("A.resources")), before);
}

#[test]
fn newer_reference_rebuilds_only_xml_sources() {
    let fx = Fixture::new().unwrap();
    let xml = fx.write("A.resx", resx_strings(&[("Title", "Main")])).unwrap();
    let text = fx.write("B.txt", "b=2\n").unwrap();
    let dll = fx.write("lib/Widgets.dll", "assembly").unwrap();
    for p in [&xml, &text, &dll] {
        age(p, 100).unwrap();
    }
    let mut task = inputs(&[xml, text]);
    task.references = vec![dll.clone()];
    build(&task, Some(&fx.state_file()));
    let before = [mtime(&fx.path("A.resources")), mtime(&fx.path("B.resources"))];

    touch_ahead(&dll, 60).unwrap();
    let run = build(&task, Some(&fx.state_file()));

    assert!(run.result.success);
    assert_ne!(mtime(&fx.path("A.resources")), before[0]);
    assert_eq!(mtime(&fx.path("B.resources")), before[1]);

    let settled = mtime(&fx.path("A.resources"));
    for _ in 0..3 {
        let again = build(&task, Some(&fx.state_file()));
        assert!(again.diagnostics.is_empty());
    }
    assert_eq!(mtime(&fx.path("A.resources")), settled);
}

#[test]
fn missing_reference_fails_converted_sources() {
    let fx = Fixture::new().unwrap();
    let a = fx.write("A.txt", "a=1\n").unwrap();
    let mut task = inputs(&[a]);
    task.references = vec![fx.path("lib/Gone.dll")];

    let run = build(&task, None);

    assert!(!run.result.success);
    assert!(run.errors()[0].message.contains("Gone.dll"));
}

fn image_resx(file: &str) -> String {
    format!(
        r#"<root>
  <data name="Image" type="System.Resources.ResXFileRef, System.Windows.Forms">
    <value>{file};System.Byte[], mscorlib</value>
  </data>
</root>"#
    )
}

#[test]
fn linked_file_changes_rebuild_only_the_linking_source() {
    let fx = Fixture::new().unwrap();
    let logo = fx.write("img/logo.bmp", [1u8, 2, 3]).unwrap();
    let banner = fx.write("img/banner.bmp", [4u8, 5, 6]).unwrap();
    let a = fx.write("Logo.resx", image_resx("img/logo.bmp")).unwrap();
    let b = fx.write("Banner.resx", image_resx("img/banner.bmp")).unwrap();
    for p in [&logo, &banner, &a, &b] {
        age(p, 100).unwrap();
    }
    let task = inputs(&[a, b]);

    assert!(build(&task, Some(&fx.state_file())).result.success);
    let before = [mtime(&fx.path("Logo.resources")), mtime(&fx.path("Banner.resources"))];
    build(&task, Some(&fx.state_file()));
    assert_eq!(
        [mtime(&fx.path("Logo.resources")), mtime(&fx.path("Banner.resources"))],
        before
    );

    touch_ahead(&logo, 60).unwrap();
    assert!(build(&task, Some(&fx.state_file())).result.success);
    assert_ne!(mtime(&fx.path("Logo.resources")), before[0]);
    assert_eq!(mtime(&fx.path("Banner.resources")), before[1]);

    std::fs::remove_file(&logo).unwrap();
    let run = build(&task, Some(&fx.state_file()));
    assert!(!run.result.success);
    assert_eq!(run.codes(), vec!["R001"]);
    assert_eq!(run.output_paths(), vec![fx.path("Banner.resources")]);
}

#[test]
fn without_a_state_file_every_run_converts() {
    let fx = Fixture::new().unwrap();
    let a = fx.write("A.txt", "a=1\n").unwrap();
    age(&a, 100).unwrap();
    let task = inputs(&[a]);

    let first = build(&task, None);
    assert_eq!(first.result.files_written, vec![fx.path("A.resources")]);
    age(&fx.path("A.resources"), 50).unwrap();
    let before = mtime(&fx.path("A.resources"));

    build(&task, None);
    assert_ne!(mtime(&fx.path("A.resources")), before);
}

#[test]
fn corrupt_state_file_means_full_rebuild_with_a_warning() {
    let fx = Fixture::new().unwrap();
    let a = fx.write("A.txt", "a=1\n").unwrap();
    age(&a, 100).unwrap();
    let task = inputs(&[a]);
    build(&task, Some(&fx.state_file()));
    let before = mtime(&fx.path("A.resources"));

    std::fs::write(fx.state_file(), b"definitely not a state file").unwrap();
    let run = build(&task, Some(&fx.state_file()));

    assert!(run.result.success);
    assert_eq!(run.codes(), vec!["S001"]);
    assert_ne!(mtime(&fx.path("A.resources")), before);
    assert_eq!(run.result.files_written.last(), Some(&fx.state_file()));

    let next = build(&task, Some(&fx.state_file()));
    assert!(next.diagnostics.is_empty());
}

#[test]
fn unwritable_state_file_is_only_a_warning() {
    let fx = Fixture::new().unwrap();
    let a = fx.write("A.txt", "a=1\n").unwrap();
    fx.write("blocker", "a file where a directory should be").unwrap();
    let state = fx.path("blocker/state");

    let run = build(&inputs(&[a]), Some(&state));

    assert!(run.result.success);
    assert!(run.errors().is_empty());
    assert_eq!(run.codes().last().map(String::as_str), Some("S002"));
    assert_eq!(run.result.files_written, vec![fx.path("A.resources")]);
}
