use nu_ansi_term::Color::Cyan;

const RULE: &str = "------------------------------------------------------------------------------";

/// Print info on console.
pub fn info(message: &str, data: Option<&str>) {
    if let Some(data) = data {
        println!("{}: {}", Cyan.paint(message), Cyan.paint(data));
        return;
    }
    println!("{}", Cyan.paint(message));
}

/// Print the banner shown before collection starts.
pub fn banner(title: &str, note: &str) {
    info(RULE, None);
    info(title, None);
    info(note, None);
    info(RULE, None);
}
