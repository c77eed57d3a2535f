#[cfg(test)]
mod session_tests {
    use std::path::Path;

    use campus_cli::interpreter::{FAREWELL, HELP_TEXT, UNKNOWN_COMMAND};
    use campus_cli::{AreaStore, Interpreter, SystemManager};
    use rstest::rstest;

    fn run(data_dir: &Path, script: &str) -> Vec<String> {
        let mut output = Vec::new();
        let manager = SystemManager::new(AreaStore::new(data_dir));
        let mut interpreter = Interpreter::new(script.as_bytes(), &mut output, manager);
        interpreter.run().unwrap();
        drop(interpreter);
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[rstest]
    #[case::services("services\n", vec!["System bounds not defined."])]
    #[case::service_line_is_skipped("service eating 1 1 1 1 Cafe\n", vec!["System bounds not defined."])]
    #[case::unknown_is_silent("dance\n", vec![])]
    #[case::missing_area("load Nowhere\n", vec!["Bounds Nowhere does not exists."])]
    #[case::invalid_bounds("bounds 0 0 10 10 Upside Down\n", vec!["Invalid bounds."])]
    #[case::exit("exit\nservices\n", vec![FAREWELL])]
    fn verify_commands_without_area(#[case] script: &str, #[case] expected: Vec<&str>) {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(run(dir.path(), script), expected);
    }

    #[test]
    fn test_help_lists_every_command() {
        let dir = tempfile::tempdir().unwrap();
        let output = run(dir.path(), "HELP\n");
        assert_eq!(output.len(), 20);
        assert_eq!(output.join("\n"), HELP_TEXT);
    }

    #[test]
    fn test_full_session() {
        let dir = tempfile::tempdir().unwrap();
        let script = "\
bounds 100 0 0 100 Old Town
service eating 10 10 5 2 Canteen
service lodging 12 10 20 3 Hostel
service leisure 20 20 10 50 Museum
service eating 500 5 5 5 Far
service cinema 1 1 1 1 Screen
service eating 10 10 5 2 canteen
service leisure 20 20 0 5 Free
services
student bookish
Ana
Portugal
Hostel
student thrifty
Eva
Spain
hostel
student nerd
Zed
Portugal
Hostel
student outgoing
Rui
Portugal
Atlantis
students all
students France
dance
go Ana
Museum
go Eva
Canteen
go Ana
Hostel
go Ana
Museum
users > Hostel
users < Canteen
users > Museum
users = Canteen
star 5 Museum
Great exhibits
star 9 Museum
whatever
star 3 Nowhere
meh
ranking
tag EXHIBITS
tag nothing
where Eva
visited Ana
visited Eva
ranked eating 4 Ana
ranked eating 2 Ana
ranked lodging 9 Ana
find Ana
leisure
find Eva
eating
move Eva
Hostel
move Eva
Museum
leave Eva
users < Canteen
star five Museum
save
bounds 100 0 0 100 Other
bounds 50 0 0 50 Second
load old town
students ALL
exit
";
        let expected = [
            "Old Town created.",
            "eating Canteen added.",
            "lodging Hostel added.",
            "leisure Museum added.",
            "Invalid location!",
            "Invalid service type!",
            "Canteen already exists!",
            "Invalid ticket price.",
            "Canteen: eating (10, 10).",
            "Hostel: lodging (12, 10).",
            "Museum: leisure (20, 20).",
            "Ana added.",
            "Eva added.",
            "Invalid student type!",
            "lodging Atlantis does not exist!",
            "Ana: bookish at Hostel.",
            "Eva: thrifty at Hostel.",
            "No students from France!",
            UNKNOWN_COMMAND,
            "Ana is now at Museum.",
            "Eva is now at Canteen.",
            "Hostel is not a valid service!",
            "Already there!",
            "Ana: bookish",
            "Eva: thrifty",
            "Eva: thrifty",
            "Museum does not control student entry and exit!",
            "This order does not exists!",
            "Your evaluation has been registered!",
            "Invalid evaluation!",
            "Nowhere does not exist!",
            "Services sorted in descending order",
            "Museum: 5",
            "Canteen: 4",
            "Hostel: 4",
            "leisure Museum",
            "There are no services with this tag!",
            "Eva is at Canteen eating (10, 10).",
            "Museum",
            "Eva is thrifty!",
            "eating services closer with 4 average",
            "Canteen",
            "No eating services with average!",
            "Invalid stars!",
            "Museum",
            "Canteen",
            "That is Eva's home!",
            "lodging Museum does not exist!",
            "Eva has left.",
            "No students on Canteen!",
            UNKNOWN_COMMAND,
            "Old Town saved.",
            "Bounds already exists. Please load it!",
            "Second created.",
            "Old Town loaded.",
            "Ana: bookish at Museum.",
            FAREWELL,
        ];
        assert_eq!(run(dir.path(), script), expected);
        assert!(dir.path().join("old_town.json").is_file());
        assert!(dir.path().join("second.json").is_file());
    }

    #[test]
    fn test_thrifty_student_is_distracted() {
        let dir = tempfile::tempdir().unwrap();
        let script = "\
bounds 100 0 0 100 Campus
service lodging 10 10 20 2 Hostel
service eating 10 12 5 10 Cheap
service eating 10 14 9 10 Dear
student thrifty
Eva
Spain
Hostel
go Eva
Cheap
go Eva
Dear
exit
";
        let output = run(dir.path(), script);
        assert_eq!(
            &output[output.len() - 3..],
            ["Eva is now at Cheap.", "Eva is now at Dear. Eva is distracted!", FAREWELL]
        );
    }

    #[test]
    fn test_end_of_input_saves_area() {
        let dir = tempfile::tempdir().unwrap();
        let output = run(dir.path(), "bounds 10 0 0 10 Tiny Place\nservice leisure 5 5 10 0 Park\n");
        assert_eq!(output, ["Tiny Place created.", "leisure Park added."]);
        assert!(dir.path().join("tiny_place.json").is_file());

        let output = run(dir.path(), "load TINY PLACE\nservices\n");
        assert_eq!(output, ["Tiny Place loaded.", "Park: leisure (5, 5)."]);
    }
}
