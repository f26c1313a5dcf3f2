//! Strongly-typed accessor generation through full builds.

use resforge_conformance::{age, build, inputs, mtime, touch_ahead, Fixture};

fn csharp_task(fx: &Fixture, content: &str) -> resforge_build::TaskInputs {
    let src = fx.write("Strings.txt", content).unwrap();
    age(&src, 100).unwrap();
    let mut task = inputs(&[src]);
    task.strongly_typed.language = Some("CSharp".into());
    task
}

#[test]
fn accessor_is_listed_last_after_the_state_file() {
    let fx = Fixture::new().unwrap();
    let task = csharp_task(&fx, "Title=Main\nGreeting=Hello\n");

    let run = build(&task, Some(&fx.state_file()));

    assert!(run.result.success);
    assert_eq!(
        run.result.files_written,
        vec![fx.path("Strings.resources"), fx.state_file(), fx.path("Strings.cs")]
    );
    assert_eq!(run.result.strongly_typed_file_name, Some(fx.path("Strings.cs")));
    assert_eq!(run.result.strongly_typed_class_name.as_deref(), Some("Strings"));
    let src = std::fs::read_to_string(fx.path("Strings.cs")).unwrap();
    assert!(src.contains("internal class Strings"));
    assert!(src.contains("internal static string Greeting"));
}

#[test]
fn deleted_accessor_is_regenerated_without_reconverting() {
    let fx = Fixture::new().unwrap();
    let task = csharp_task(&fx, "Title=Main\n");
    let first = build(&task, Some(&fx.state_file()));
    let payload = mtime(&fx.path("Strings.resources"));

    std::fs::remove_file(fx.path("Strings.cs")).unwrap();
    let second = build(&task, Some(&fx.state_file()));

    assert!(second.result.success);
    assert!(fx.path("Strings.cs").is_file());
    assert_eq!(mtime(&fx.path("Strings.resources")), payload);
    assert_eq!(second.result.files_written, first.result.files_written);
}

#[test]
fn value_change_keeps_accessor_but_new_name_regenerates_it() {
    let fx = Fixture::new().unwrap();
    let task = csharp_task(&fx, "Title=Main\n");
    build(&task, Some(&fx.state_file()));
    let accessor = mtime(&fx.path("Strings.cs"));

    let src = fx.write("Strings.txt", "Title=Home\n").unwrap();
    touch_ahead(&src, 5).unwrap();
    build(&task, Some(&fx.state_file()));
    assert_eq!(mtime(&fx.path("Strings.cs")), accessor);

    fx.write("Strings.txt", "Title=Home\nFooter=Bye\n").unwrap();
    touch_ahead(&src, 10).unwrap();
    build(&task, Some(&fx.state_file()));
    let text = std::fs::read_to_string(fx.path("Strings.cs")).unwrap();
    assert!(text.contains("Footer"));
}

#[test]
fn changed_class_identity_regenerates() {
    let fx = Fixture::new().unwrap();
    let mut task = csharp_task(&fx, "Title=Main\n");
    build(&task, Some(&fx.state_file()));

    task.strongly_typed.class_name = Some("Texts".into());
    task.strongly_typed.namespace = Some("Acme.Ui".into());
    task.strongly_typed.public_class = true;
    let run = build(&task, Some(&fx.state_file()));

    assert_eq!(run.result.strongly_typed_class_name.as_deref(), Some("Texts"));
    let text = std::fs::read_to_string(fx.path("Strings.cs")).unwrap();
    assert!(text.contains("namespace Acme.Ui"));
    assert!(text.contains("public class Texts"));
}

#[test]
fn resources_namespace_sets_the_manifest_prefix() {
    let fx = Fixture::new().unwrap();
    let mut task = csharp_task(&fx, "Title=Main\n");
    task.strongly_typed.namespace = Some("Acme.Ui".into());
    task.strongly_typed.resources_namespace = Some("Acme".into());
    build(&task, Some(&fx.state_file()));

    let text = std::fs::read_to_string(fx.path("Strings.cs")).unwrap();
    assert!(text.contains("namespace Acme.Ui"));
    assert!(text.contains("new ResourceManager(\"Acme.Strings\""));

    task.strongly_typed.resources_namespace = Some(String::new());
    let run = build(&task, Some(&fx.state_file()));

    assert_eq!(
        run.result.files_written,
        vec![fx.path("Strings.resources"), fx.state_file(), fx.path("Strings.cs")]
    );
    let text = std::fs::read_to_string(fx.path("Strings.cs")).unwrap();
    assert!(text.contains("namespace Acme.Ui"));
    assert!(text.contains("new ResourceManager(\"Strings\""));
}

#[test]
fn visual_basic_accessor_at_explicit_path() {
    let fx = Fixture::new().unwrap();
    let mut task = csharp_task(&fx, "Title=Main\n");
    task.strongly_typed.language = Some("VB".into());
    task.strongly_typed.file_name = Some(fx.path("gen/Resources.Designer.vb"));

    let run = build(&task, None);

    assert!(run.result.success);
    assert_eq!(
        run.result.strongly_typed_class_name.as_deref(),
        Some("Resources_Designer")
    );
    let text = std::fs::read_to_string(fx.path("gen/Resources.Designer.vb")).unwrap();
    assert!(text.contains("Friend Class Resources_Designer"));
}

#[test]
fn invalid_class_name_fails_the_whole_run() {
    let fx = Fixture::new().unwrap();
    let mut task = csharp_task(&fx, "Title=Main\n");
    task.strongly_typed.class_name = Some("~!@#$%^&*(".into());

    let run = build(&task, Some(&fx.state_file()));

    assert!(!run.result.success);
    assert_eq!(run.codes(), vec!["A001"]);
    assert!(run.result.output_resources.is_empty());
    assert_eq!(run.result.files_written, vec![fx.state_file()]);
    assert_eq!(run.result.strongly_typed_class_name.as_deref(), Some("~!@#$%^&*("));
    assert!(fx.path("Strings.resources").is_file());
    assert!(!fx.path("Strings.cs").exists());
}

#[test]
fn directory_at_accessor_path_fails() {
    let fx = Fixture::new().unwrap();
    let task = csharp_task(&fx, "Title=Main\n");
    std::fs::create_dir(fx.path("Strings.cs")).unwrap();

    let run = build(&task, None);

    assert!(!run.result.success);
    assert_eq!(run.codes(), vec!["A001"]);
    assert!(run.errors()[0].message.contains("directory"));
}

#[test]
fn unknown_language_still_echoes_a_class_name() {
    let fx = Fixture::new().unwrap();
    let mut task = csharp_task(&fx, "Title=Main\n");
    task.strongly_typed.language = Some("Cobol".into());

    let run = build(&task, None);

    assert!(!run.result.success);
    assert_eq!(run.codes(), vec!["A001"]);
    assert_eq!(run.result.strongly_typed_file_name, None);
    assert_eq!(run.result.strongly_typed_class_name.as_deref(), Some("Strings"));
}

#[test]
fn failed_source_skips_generation_but_echoes() {
    let fx = Fixture::new().unwrap();
    let task = csharp_task(&fx, "no separator\n");

    let run = build(&task, None);

    assert!(!run.result.success);
    assert_eq!(run.codes(), vec!["R001"]);
    assert_eq!(run.result.strongly_typed_file_name, Some(fx.path("Strings.cs")));
    assert!(!fx.path("Strings.cs").exists());
}
