// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use kiln_core::message::{CompilerMessage, TargetProgressPhase};
use kiln_core::target::TargetId;

#[test]
fn every_message_kind_handles_without_panicking() {
    let printer = ProgressPrinter;
    printer.handle(&BuildMessage::Progress("cleaning".to_string()));
    printer.handle(&BuildMessage::Compiler(CompilerMessage::warning("test", "careful")));
    printer.handle(&BuildMessage::FileDeleted(vec![]));
    printer.handle(&BuildMessage::FileGenerated(vec![]));
    printer.handle(&BuildMessage::TargetProgress {
        targets: vec![TargetId::new("core")],
        phase: TargetProgressPhase::Started,
    });
    printer.handle(&BuildMessage::DoneSomething);
}
