fn main() -> anyhow::Result<()> {
    amta::cli::run_cli()
}
