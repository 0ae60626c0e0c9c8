fn main() -> anyhow::Result<()> {
    vault_folio::flow::run()
}
