use glow::HasContext;

use super::camera::ArcBallCamera;
use super::mesh::{LineMeshData, MeshData};
use crate::export::FrameCapture;

// ── Render parameters ────────────────────────────────────────

/// Parameters for rendering the viewport
pub struct RenderParams {
    /// Viewport rectangle [x, y, width, height] in pixels
    pub viewport: [f32; 4],
    /// Show grid wires and anchor points
    pub grid_visible: bool,
    /// Anchor marker size in pixels
    pub point_size: f32,
    /// Background color RGB
    pub bg_color: [u8; 3],
}

// ── GPU mesh handles ─────────────────────────────────────────

struct GpuMesh {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ibo: glow::Buffer,
    index_count: i32,
}

struct GpuLines {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    vertex_count: i32,
}

// ── Main GL renderer ─────────────────────────────────────────

pub struct GlRenderer {
    mesh_program: glow::Program,
    line_program: glow::Program,
    point_program: glow::Program,
    grid_lines: Option<GpuLines>,
    grid_points: Option<GpuLines>,
    /// Grid version the uploaded wires belong to
    last_grid_version: Option<u64>,
    /// One GPU mesh per visible voxel, world-space vertices
    voxel_meshes: Vec<GpuMesh>,
    /// Merged arctic surface, if active
    unified: Option<GpuMesh>,
    /// Scene version the uploaded meshes belong to
    last_scene_version: Option<u64>,
    /// Placement preview wireframe (re-uploaded every frame)
    preview: Option<GpuLines>,
}

impl GlRenderer {
    pub fn new(gl: &glow::Context) -> Self {
        let mesh_program = compile_program(gl, MESH_VERT, MESH_FRAG);
        let line_program = compile_program(gl, LINE_VERT, LINE_FRAG);
        let point_program = compile_program(gl, POINT_VERT, POINT_FRAG);

        Self {
            mesh_program,
            line_program,
            point_program,
            grid_lines: None,
            grid_points: None,
            last_grid_version: None,
            voxel_meshes: Vec::new(),
            unified: None,
            last_scene_version: None,
            preview: None,
        }
    }

    /// Upload grid wires and anchor points, replacing the previous
    /// lattice's buffers when the grid was rebuilt.
    pub fn sync_grid(
        &mut self,
        gl: &glow::Context,
        lines: &LineMeshData,
        points: &LineMeshData,
        version: u64,
    ) {
        if self.last_grid_version == Some(version) {
            return;
        }
        self.last_grid_version = Some(version);

        if let Some(old) = self.grid_lines.take() {
            delete_lines(gl, old);
        }
        if let Some(old) = self.grid_points.take() {
            delete_lines(gl, old);
        }

        self.grid_lines = Some(upload_lines(gl, lines));
        self.grid_points = Some(upload_lines(gl, points));
    }

    /// Upload voxel and unified meshes, replacing previous buffers.
    pub fn sync_scene(
        &mut self,
        gl: &glow::Context,
        voxels: &[MeshData],
        unified: Option<&MeshData>,
        version: u64,
    ) {
        if self.last_scene_version == Some(version) {
            return;
        }
        self.last_scene_version = Some(version);

        for mesh in self.voxel_meshes.drain(..) {
            delete_mesh(gl, mesh);
        }
        if let Some(old) = self.unified.take() {
            delete_mesh(gl, old);
        }

        for data in voxels {
            self.voxel_meshes.push(upload_mesh(gl, data));
        }
        self.unified = unified.map(|data| upload_mesh(gl, data));
    }

    /// Upload or remove the placement preview wireframe
    pub fn sync_preview(&mut self, gl: &glow::Context, data: Option<&LineMeshData>) {
        if let Some(old) = self.preview.take() {
            delete_lines(gl, old);
        }
        if let Some(line_data) = data {
            self.preview = Some(upload_lines(gl, line_data));
        }
    }

    /// Render the scene
    pub fn paint(&self, gl: &glow::Context, camera: &ArcBallCamera, params: &RenderParams) {
        let aspect = params.viewport[2] / params.viewport[3];
        let vp = camera.view_projection(aspect);

        unsafe {
            gl.viewport(
                params.viewport[0] as i32,
                params.viewport[1] as i32,
                params.viewport[2] as i32,
                params.viewport[3] as i32,
            );
            gl.scissor(
                params.viewport[0] as i32,
                params.viewport[1] as i32,
                params.viewport[2] as i32,
                params.viewport[3] as i32,
            );
            gl.enable(glow::SCISSOR_TEST);

            // Clear viewport area with the mode's background color
            gl.clear_color(
                params.bg_color[0] as f32 / 255.0,
                params.bg_color[1] as f32 / 255.0,
                params.bg_color[2] as f32 / 255.0,
                1.0,
            );
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

            gl.enable(glow::DEPTH_TEST);
            gl.depth_func(glow::LESS);
            gl.enable(glow::BLEND);
            gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);

            // Draw grid wires
            if params.grid_visible {
                gl.use_program(Some(self.line_program));
                set_uniform_mat4(gl, self.line_program, "u_mvp", &vp);
                if let Some(ref lines) = self.grid_lines {
                    draw_lines(gl, lines);
                }

                // Anchor point markers
                gl.use_program(Some(self.point_program));
                set_uniform_mat4(gl, self.point_program, "u_mvp", &vp);
                set_uniform_f32(gl, self.point_program, "u_point_size", params.point_size);
                gl.enable(glow::PROGRAM_POINT_SIZE);
                if let Some(ref points) = self.grid_points {
                    draw_points(gl, points);
                }
                gl.disable(glow::PROGRAM_POINT_SIZE);
            }

            // Draw voxel meshes (or the merged surface)
            gl.use_program(Some(self.mesh_program));
            set_uniform_mat4(gl, self.mesh_program, "u_mvp", &vp);

            // Light direction in world space
            let light_dir = glam::Vec3::new(0.3, 0.8, 0.5).normalize();
            set_uniform_vec3(gl, self.mesh_program, "u_light_dir", &light_dir);

            for mesh in &self.voxel_meshes {
                draw_mesh(gl, mesh);
            }
            if let Some(ref unified) = self.unified {
                draw_mesh(gl, unified);
            }

            // Placement preview on top (half-opacity wireframe)
            if let Some(ref preview) = self.preview {
                gl.use_program(Some(self.line_program));
                set_uniform_mat4(gl, self.line_program, "u_mvp", &vp);
                gl.line_width(2.0);
                draw_lines(gl, preview);
                gl.line_width(1.0);
            }

            gl.disable(glow::BLEND);
            gl.disable(glow::DEPTH_TEST);
            gl.disable(glow::SCISSOR_TEST);
            gl.use_program(None);
        }
    }

    /// Read the viewport's pixels back from the framebuffer. Must run right
    /// after [`paint`](Self::paint), before the buffer is reused.
    pub fn capture(&self, gl: &glow::Context, viewport: [f32; 4]) -> FrameCapture {
        let width = viewport[2] as u32;
        let height = viewport[3] as u32;
        let mut rgba = vec![0u8; (width * height * 4) as usize];

        unsafe {
            gl.read_pixels(
                viewport[0] as i32,
                viewport[1] as i32,
                width as i32,
                height as i32,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelPackData::Slice(Some(&mut rgba)),
            );
        }

        // GL rows run bottom-up; captures are top-down
        let row = (width * 4) as usize;
        let mut flipped = vec![0u8; rgba.len()];
        for y in 0..height as usize {
            let src = (height as usize - 1 - y) * row;
            flipped[y * row..(y + 1) * row].copy_from_slice(&rgba[src..src + row]);
        }

        FrameCapture {
            width,
            height,
            rgba: flipped,
        }
    }

    #[allow(dead_code)]
    pub fn destroy(&mut self, gl: &glow::Context) {
        unsafe {
            gl.delete_program(self.mesh_program);
            gl.delete_program(self.line_program);
            gl.delete_program(self.point_program);
        }
        if let Some(lines) = self.grid_lines.take() {
            delete_lines(gl, lines);
        }
        if let Some(points) = self.grid_points.take() {
            delete_lines(gl, points);
        }
        if let Some(preview) = self.preview.take() {
            delete_lines(gl, preview);
        }
        for mesh in self.voxel_meshes.drain(..) {
            delete_mesh(gl, mesh);
        }
        if let Some(unified) = self.unified.take() {
            delete_mesh(gl, unified);
        }
    }
}

// ── GPU upload / release ─────────────────────────────────────

fn upload_mesh(gl: &glow::Context, data: &MeshData) -> GpuMesh {
    unsafe {
        let vao = gl.create_vertex_array().unwrap();
        gl.bind_vertex_array(Some(vao));

        let vbo = gl.create_buffer().unwrap();
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            cast_slice(&data.vertices),
            glow::STATIC_DRAW,
        );

        let stride = 9 * 4; // 9 floats * 4 bytes
        // position: location 0
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
        // normal: location 1
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 3, glow::FLOAT, false, stride, 3 * 4);
        // color: location 2
        gl.enable_vertex_attrib_array(2);
        gl.vertex_attrib_pointer_f32(2, 3, glow::FLOAT, false, stride, 6 * 4);

        let ibo = gl.create_buffer().unwrap();
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ibo));
        gl.buffer_data_u8_slice(
            glow::ELEMENT_ARRAY_BUFFER,
            cast_slice(&data.indices),
            glow::STATIC_DRAW,
        );

        gl.bind_vertex_array(None);

        GpuMesh {
            vao,
            vbo,
            ibo,
            index_count: data.indices.len() as i32,
        }
    }
}

fn upload_lines(gl: &glow::Context, data: &LineMeshData) -> GpuLines {
    unsafe {
        let vao = gl.create_vertex_array().unwrap();
        gl.bind_vertex_array(Some(vao));

        let vbo = gl.create_buffer().unwrap();
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            cast_slice(&data.vertices),
            glow::STATIC_DRAW,
        );

        let stride = 7 * 4; // 7 floats * 4 bytes
        // position: location 0
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
        // color: location 1
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 4, glow::FLOAT, false, stride, 3 * 4);

        gl.bind_vertex_array(None);

        GpuLines {
            vao,
            vbo,
            vertex_count: (data.vertices.len() / 7) as i32,
        }
    }
}

fn delete_mesh(gl: &glow::Context, mesh: GpuMesh) {
    unsafe {
        gl.delete_vertex_array(mesh.vao);
        gl.delete_buffer(mesh.vbo);
        gl.delete_buffer(mesh.ibo);
    }
}

fn delete_lines(gl: &glow::Context, lines: GpuLines) {
    unsafe {
        gl.delete_vertex_array(lines.vao);
        gl.delete_buffer(lines.vbo);
    }
}

// ── Draw calls ───────────────────────────────────────────────

unsafe fn draw_mesh(gl: &glow::Context, mesh: &GpuMesh) {
    gl.bind_vertex_array(Some(mesh.vao));
    gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(mesh.ibo));
    gl.draw_elements(glow::TRIANGLES, mesh.index_count, glow::UNSIGNED_INT, 0);
    gl.bind_vertex_array(None);
}

unsafe fn draw_lines(gl: &glow::Context, lines: &GpuLines) {
    gl.bind_vertex_array(Some(lines.vao));
    gl.draw_arrays(glow::LINES, 0, lines.vertex_count);
    gl.bind_vertex_array(None);
}

unsafe fn draw_points(gl: &glow::Context, points: &GpuLines) {
    gl.bind_vertex_array(Some(points.vao));
    gl.draw_arrays(glow::POINTS, 0, points.vertex_count);
    gl.bind_vertex_array(None);
}

// ── Shader compilation ───────────────────────────────────────

fn compile_program(gl: &glow::Context, vert_src: &str, frag_src: &str) -> glow::Program {
    unsafe {
        let program = gl.create_program().unwrap();

        let vert = gl.create_shader(glow::VERTEX_SHADER).unwrap();
        gl.shader_source(vert, vert_src);
        gl.compile_shader(vert);
        if !gl.get_shader_compile_status(vert) {
            let log = gl.get_shader_info_log(vert);
            tracing::error!("Vertex shader error: {log}");
        }

        let frag = gl.create_shader(glow::FRAGMENT_SHADER).unwrap();
        gl.shader_source(frag, frag_src);
        gl.compile_shader(frag);
        if !gl.get_shader_compile_status(frag) {
            let log = gl.get_shader_info_log(frag);
            tracing::error!("Fragment shader error: {log}");
        }

        gl.attach_shader(program, vert);
        gl.attach_shader(program, frag);
        gl.link_program(program);
        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            tracing::error!("Program link error: {log}");
        }

        gl.delete_shader(vert);
        gl.delete_shader(frag);

        program
    }
}

// ── Uniform setters ──────────────────────────────────────────

fn set_uniform_mat4(gl: &glow::Context, program: glow::Program, name: &str, mat: &glam::Mat4) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_matrix_4_f32_slice(loc.as_ref(), false, &mat.to_cols_array());
    }
}

fn set_uniform_vec3(gl: &glow::Context, program: glow::Program, name: &str, v: &glam::Vec3) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_3_f32(loc.as_ref(), v.x, v.y, v.z);
    }
}

fn set_uniform_f32(gl: &glow::Context, program: glow::Program, name: &str, v: f32) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_1_f32(loc.as_ref(), v);
    }
}

// ── Byte cast helper ─────────────────────────────────────────

fn cast_slice<T: Copy>(slice: &[T]) -> &[u8] {
    unsafe { std::slice::from_raw_parts(slice.as_ptr() as *const u8, std::mem::size_of_val(slice)) }
}

// ── Shaders ──────────────────────────────────────────────────

const MESH_VERT: &str = r#"#version 330 core
uniform mat4 u_mvp;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec3 a_color;

out vec3 v_normal;
out vec3 v_color;

void main() {
    gl_Position = u_mvp * vec4(a_position, 1.0);
    v_normal = a_normal;
    v_color = a_color;
}
"#;

const MESH_FRAG: &str = r#"#version 330 core
uniform vec3 u_light_dir;

in vec3 v_normal;
in vec3 v_color;

out vec4 frag_color;

void main() {
    vec3 n = normalize(v_normal);
    float diffuse = max(dot(n, u_light_dir), 0.0);
    float ambient = 0.3;
    float light = ambient + diffuse * 0.7;
    frag_color = vec4(v_color * light, 1.0);
}
"#;

const LINE_VERT: &str = r#"#version 330 core
uniform mat4 u_mvp;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec4 a_color;

out vec4 v_color;

void main() {
    gl_Position = u_mvp * vec4(a_position, 1.0);
    v_color = a_color;
}
"#;

const LINE_FRAG: &str = r#"#version 330 core
in vec4 v_color;
out vec4 frag_color;

void main() {
    frag_color = v_color;
}
"#;

const POINT_VERT: &str = r#"#version 330 core
uniform mat4 u_mvp;
uniform float u_point_size;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec4 a_color;

out vec4 v_color;

void main() {
    gl_Position = u_mvp * vec4(a_position, 1.0);
    gl_PointSize = u_point_size;
    v_color = a_color;
}
"#;

const POINT_FRAG: &str = r#"#version 330 core
in vec4 v_color;
out vec4 frag_color;

void main() {
    // round markers
    vec2 d = gl_PointCoord - vec2(0.5);
    if (dot(d, d) > 0.25) {
        discard;
    }
    frag_color = v_color;
}
"#;
