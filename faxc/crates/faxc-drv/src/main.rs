use std::process::ExitCode;

fn main() -> ExitCode {
    faxc_drv::main()
}
