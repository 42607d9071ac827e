mod api;
mod suite;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn suite() -> Result<regex_graph_test::RegexTests> {
    let mut tests = regex_graph_test::RegexTests::new();
    macro_rules! load {
        ($name:expr) => {{
            const DATA: &str = include_str!(concat!("data/", $name, ".toml"));
            tests.load_str($name, DATA)?;
        }};
    }

    load!("backreference");
    load!("basic");
    load!("captures");
    load!("class");
    load!("errors");
    load!("iter");
    load!("repetition");

    Ok(tests)
}
