#[cfg(windows)]
pub fn execute() -> turboshell_core::ShellResult<()> {
    let area = turboshell_windows::primary_work_area()?;
    println!(
        "{}x{} at ({}, {})",
        area.width, area.height, area.x, area.y
    );
    if let Ok(json) = serde_json::to_string(&area) {
        println!("{json}");
    }
    Ok(())
}

#[cfg(not(windows))]
pub fn execute() -> turboshell_core::ShellResult<()> {
    Err(turboshell_core::ShellError::Unsupported {
        command: "debug work-area",
    })
}
