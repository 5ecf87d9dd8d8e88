use crate::plan::ShiftMap;

use super::writer::{vec2_of, Access, WgslWriter};
use super::KernelSpec;

pub(super) fn emit(spec: &KernelSpec, map: &ShiftMap) -> String {
    let element = vec2_of(spec.precision.compute_scalar());
    let mut w = WgslWriter::new();

    if spec.real_input {
        w.comment("Spectral shift, half-spectrum layout: rows split at height/2.");
    } else {
        w.comment("Spectral shift, full layout: both axes split at size/2.");
    }
    w.const_u32("SIZE_X", spec.size[0]);
    w.const_u32("SIZE_Y", spec.size[1]);
    w.const_u32("IN_ROW", spec.input_stride[0]);
    w.const_u32("IN_PLANE", spec.input_stride[1]);
    w.const_u32("OUT_ROW", spec.output_stride[0]);
    w.const_u32("OUT_PLANE", spec.output_stride[1]);
    if !spec.real_input {
        let x = map.axes[0];
        w.const_u32("SPLIT_X", x.split);
        w.const_u32("OFFSET_X", x.offset);
        w.const_u32("SPAN_X", x.span);
    }
    let y = map.axes[1];
    w.const_u32("SPLIT_Y", y.split);
    w.const_u32("OFFSET_Y", y.offset);
    w.const_u32("SPAN_Y", y.span);
    w.blank();

    w.storage(0, "src", Access::Read, &element);
    w.storage(1, "dst", Access::ReadWrite, &element);
    w.blank();

    w.open("fn rotate(i: u32, split: u32, offset: u32, span: u32) -> u32");
    w.open("if (i < split)");
    w.line("return i;");
    w.close();
    w.line("return split + (i - split + offset) % span;");
    w.close();
    w.blank();

    w.entry_point(spec.local_size, "@builtin(global_invocation_id) id: vec3<u32>");
    w.open("if (id.x >= SIZE_X || id.y >= SIZE_Y)");
    w.line("return;");
    w.close();
    if spec.real_input {
        w.line("let x = id.x;");
    } else {
        w.line("let x = rotate(id.x, SPLIT_X, OFFSET_X, SPAN_X);");
    }
    w.line("let y = rotate(id.y, SPLIT_Y, OFFSET_Y, SPAN_Y);");
    w.line("dst[x + y * OUT_ROW + id.z * OUT_PLANE] = src[id.x + id.y * IN_ROW + id.z * IN_PLANE];");
    w.close();

    w.finish()
}
