fn main() {
    uniffi::generate_scaffolding("src/pumplog.udl").expect("failed to generate UniFFI scaffolding");
}
