use culturehub_core::UseCase;

pub fn run() -> String {
    let mut lines = vec!["available use cases (pass the slug or the full label):".to_string()];
    lines.extend(
        UseCase::ALL
            .iter()
            .map(|use_case| format!("- {:<12} {}", use_case.slug(), use_case.label())),
    );
    lines.join("\n")
}
