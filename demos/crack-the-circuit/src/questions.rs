use circuit_engine::{Question, RoundConfig};

const CATEGORY: &str = "Electronics";

/// The four-wire electronics round.
pub fn round_config() -> RoundConfig {
    let questions = [
        (1, "What component limits current flow?", "Resistor"),
        (2, "What stores electrical energy temporarily?", "Capacitor"),
        (3, "What converts AC to DC?", "Diode"),
        (4, "What amplifies electrical signals?", "Transistor"),
    ]
    .into_iter()
    .map(|(id, prompt, answer)| {
        Question::new(id, prompt, answer)
            .with_category(CATEGORY)
            .with_points(100)
    })
    .collect();

    RoundConfig::new(questions).with_time_limit(300).with_lives(3)
}
