use taixiu_cli::exit_code;
use taixiu_cli::run;

fn code_of(args: &[&str]) -> i32 {
    let mut out = Vec::new();
    let mut err = Vec::new();
    run(args, &mut out, &mut err)
}

#[test]
fn success_paths() {
    assert_eq!(code_of(&["taixiu", "rng", "--seed", "3"]), exit_code::SUCCESS);
    assert_eq!(code_of(&["taixiu", "--version"]), exit_code::SUCCESS);
}

#[test]
fn usage_errors() {
    assert_eq!(code_of(&["taixiu"]), exit_code::ERROR);
    assert_eq!(code_of(&["taixiu", "bogus"]), exit_code::ERROR);
    assert_eq!(code_of(&["taixiu", "rng", "--seed", "x"]), exit_code::ERROR);
}
