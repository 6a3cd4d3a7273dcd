use spectral_lie::SourceRegistry;

pub fn run() -> anyhow::Result<()> {
    let registry = SourceRegistry::with_defaults();

    println!("input formats:");
    for (format, available) in registry.availability() {
        let status = if available { "available" } else { "unavailable" };
        println!("  {format:<16} {status}");
    }

    println!("cartan types (classical backend):");
    println!("  A_n (n >= 1)  sl(n+1)");
    println!("  B_n (n >= 1)  so(2n+1)");
    println!("  C_n (n >= 1)  sp(2n)");
    println!("  D_n (n >= 2)  so(2n)");
    println!("  E6-E8, F4, G2 need structure_json input");
    Ok(())
}
