use anyhow::Result;

fn main() -> Result<()> {
    cpuload::start_cpuload()
}
