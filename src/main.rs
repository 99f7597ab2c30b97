fn main() -> std::process::ExitCode {
    survey_import_lib::run()
}
