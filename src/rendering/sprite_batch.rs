use crate::glm;
use crate::rendering::data::{SpriteVertex, Texture};
use crate::rendering::shader::{bind_sprite_attribs, ShaderProgram};
use crate::rendering::sprite::{quad_vertices, Sprite};
use crate::utils::constants::*;
use crate::utils::error::BatchError;
use gl::types::*;
use std::path::Path;
use std::{mem, ptr};

/// two triangles per quad: (bottom-left, bottom-right, top-right) and (top-right, top-left, bottom-left)
const QUAD_INDICES: [GLuint; INDICES_PER_SPRITE] = [0, 1, 2, 2, 3, 0];

/// Largest slot count of a batch: a full draw of ``6 * capacity`` indices has to fit a ``GLsizei``.
pub const MAX_BATCH_CAPACITY: usize = GLsizei::MAX as usize / INDICES_PER_SPRITE;

/// checks that a full draw of the given slot count stays within the gl index and count ranges
pub fn capacity_fits(max_sprites: usize) -> bool {
    max_sprites
        .checked_mul(INDICES_PER_SPRITE)
        .is_some_and(|count| count <= GLsizei::MAX as usize)
}

/// Builds the index table for every slot of a batch. Slot ``i`` references the vertices ``4i..4i+4``.
///
/// # Panics
/// if ``max_sprites`` is larger than ``MAX_BATCH_CAPACITY``
pub fn build_index_table(max_sprites: usize) -> Vec<GLuint> {
    assert!(
        capacity_fits(max_sprites),
        "sprite capacity exceeds the index range"
    );
    (0..max_sprites)
        .flat_map(|slot| {
            let base = (slot * VERTICES_PER_SPRITE) as GLuint;
            QUAD_INDICES.map(|index| base + index)
        })
        .collect()
}

/// The fixed projection of the batch: origin top-left, y pointing down, matching the viewport size.
pub fn ortho_projection() -> glm::Mat4 {
    glm::ortho(
        0.0,
        VIEWPORT_WIDTH as f32,
        VIEWPORT_HEIGHT as f32,
        0.0,
        -1.0,
        1.0,
    )
}

/// CPU side storage of a sprite batch.
///
/// Every sprite occupies the fixed slot it was added at. The vertex buffer only ever holds the occupied prefix
/// (``sprite_count * 4`` vertices), the index table is built once for the full capacity and never changes.
#[derive(Debug, Clone)]
pub struct SpriteStore {
    vertices: Vec<SpriteVertex>,
    indices: Vec<GLuint>,
    max_sprites: usize,
}

impl SpriteStore {
    /// creates an empty store with ``MAX_SPRITES`` slots
    pub fn new() -> Self {
        Self::with_capacity(MAX_SPRITES)
    }

    /// creates an empty store with a fixed number of slots
    ///
    /// # Panics
    /// if ``max_sprites`` is larger than ``MAX_BATCH_CAPACITY``
    pub fn with_capacity(max_sprites: usize) -> Self {
        let indices = build_index_table(max_sprites);
        Self {
            vertices: Vec::with_capacity(max_sprites * VERTICES_PER_SPRITE),
            indices,
            max_sprites,
        }
    }

    /// adds a sprite to the next free slot and returns the slot index
    pub fn add(&mut self, sprite: &Sprite) -> Result<usize, BatchError> {
        if self.is_full() {
            log::warn!("sprite batch full");
            return Err(BatchError::CapacityExceeded {
                capacity: self.max_sprites,
            });
        }
        let slot = self.sprite_count();
        self.vertices.extend_from_slice(&quad_vertices(sprite));
        Ok(slot)
    }

    /// overwrites the vertices of an occupied slot
    pub fn update(&mut self, index: usize, sprite: &Sprite) -> Result<(), BatchError> {
        let sprite_count = self.sprite_count();
        if index >= sprite_count {
            log::warn!("invalid sprite index: {index}");
            return Err(BatchError::IndexOutOfRange {
                index,
                sprite_count,
            });
        }
        let start = index * VERTICES_PER_SPRITE;
        self.vertices[start..start + VERTICES_PER_SPRITE].copy_from_slice(&quad_vertices(sprite));
        Ok(())
    }

    /// number of occupied slots
    #[inline]
    pub fn sprite_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_SPRITE
    }

    /// number of slots
    #[inline]
    pub fn capacity(&self) -> usize {
        self.max_sprites
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.sprite_count() >= self.max_sprites
    }

    /// the vertices of all occupied slots
    #[inline]
    pub fn vertices(&self) -> &[SpriteVertex] {
        &self.vertices
    }

    /// the full index table
    #[inline]
    pub fn indices(&self) -> &[GLuint] {
        &self.indices
    }

    /// the four vertices of an occupied slot
    pub fn slot_vertices(&self, index: usize) -> Option<&[SpriteVertex]> {
        let start = index.checked_mul(VERTICES_PER_SPRITE)?;
        let end = start.checked_add(VERTICES_PER_SPRITE)?;
        self.vertices.get(start..end)
    }

    /// number of indices a draw of this store spans
    #[inline]
    pub fn draw_index_count(&self) -> usize {
        self.sprite_count() * INDICES_PER_SPRITE
    }
}

impl Default for SpriteStore {
    fn default() -> Self {
        Self::new()
    }
}

/// vertex array, vertex buffer and index buffer of a batch
struct GpuBuffers {
    vao: GLuint,
    vbo: GLuint,
    ibo: GLuint,
}

impl GpuBuffers {
    /// allocates the buffers for the full capacity of the store, only the index buffer is filled
    fn new(store: &SpriteStore) -> Self {
        let mut vao = 0;
        let mut vbo = 0;
        let mut ibo = 0;
        unsafe {
            gl::GenVertexArrays(1, &mut vao);
            gl::BindVertexArray(vao);

            gl::GenBuffers(1, &mut vbo);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                (store.capacity() * VERTICES_PER_SPRITE * mem::size_of::<SpriteVertex>())
                    as GLsizeiptr,
                ptr::null(),
                gl::DYNAMIC_DRAW,
            );
            bind_sprite_attribs();

            gl::GenBuffers(1, &mut ibo);
            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ibo);
            gl::BufferData(
                gl::ELEMENT_ARRAY_BUFFER,
                mem::size_of_val(store.indices()) as GLsizeiptr,
                store.indices().as_ptr() as *const GLvoid,
                gl::STATIC_DRAW,
            );

            gl::BindVertexArray(0);
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
        }
        Self { vao, vbo, ibo }
    }

    /// copies the vertices to the start of the vertex buffer
    fn upload_vertices(&self, vertices: &[SpriteVertex]) {
        unsafe {
            gl::BindBuffer(gl::ARRAY_BUFFER, self.vbo);
            gl::BufferSubData(
                gl::ARRAY_BUFFER,
                0,
                mem::size_of_val(vertices) as GLsizeiptr,
                vertices.as_ptr() as *const GLvoid,
            );
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
        }
    }
}

impl Drop for GpuBuffers {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteBuffers(1, &self.vbo);
            gl::DeleteBuffers(1, &self.ibo);
            gl::DeleteVertexArrays(1, &self.vao);
        }
    }
}

/// A fixed capacity sprite batch that renders all of its sprites with a single draw call.
///
/// The batch owns raw gl objects and must only be used (and dropped) on the thread that owns the gl context.
pub struct SpriteBatch {
    store: SpriteStore,
    buffers: GpuBuffers,
    texture: Texture,
    program: ShaderProgram,
}

impl SpriteBatch {
    /// creates a new batch with ``MAX_SPRITES`` slots drawing from the texture atlas at the given path
    pub fn new(texture_path: impl AsRef<Path>, program: ShaderProgram) -> Result<Self, BatchError> {
        Self::with_capacity(texture_path, program, MAX_SPRITES)
    }

    /// creates a new batch with a fixed number of slots
    ///
    /// # Panics
    /// if ``max_sprites`` is larger than ``MAX_BATCH_CAPACITY``
    pub fn with_capacity(
        texture_path: impl AsRef<Path>,
        program: ShaderProgram,
        max_sprites: usize,
    ) -> Result<Self, BatchError> {
        let texture = Texture::load(texture_path)?;
        Ok(Self::from_texture(texture, program, max_sprites))
    }

    /// creates a new batch from an already loaded texture
    ///
    /// # Panics
    /// if ``max_sprites`` is larger than ``MAX_BATCH_CAPACITY``
    pub fn from_texture(texture: Texture, program: ShaderProgram, max_sprites: usize) -> Self {
        let store = SpriteStore::with_capacity(max_sprites);
        let buffers = GpuBuffers::new(&store);
        log::debug!("new sprite batch created with {max_sprites} slots");

        Self {
            store,
            buffers,
            texture,
            program,
        }
    }

    /// adds a sprite and returns its slot index
    #[inline]
    pub fn add(&mut self, sprite: &Sprite) -> Result<usize, BatchError> {
        self.store.add(sprite)
    }

    /// overwrites the sprite in an occupied slot
    #[inline]
    pub fn update(&mut self, index: usize, sprite: &Sprite) -> Result<(), BatchError> {
        self.store.update(index, sprite)
    }

    /// uploads the occupied vertices and renders all sprites with one draw call
    pub fn draw(&self) {
        let projection = ortho_projection();
        let transform = glm::Mat4::identity();

        self.buffers.upload_vertices(self.store.vertices());
        unsafe {
            gl::Enable(gl::BLEND);
            gl::BlendFunc(gl::SRC_ALPHA, gl::ONE_MINUS_SRC_ALPHA);

            gl::UseProgram(self.program.id);
            gl::ActiveTexture(gl::TEXTURE0);
            gl::BindTexture(gl::TEXTURE_2D, self.texture.id);

            // bind uniforms
            gl::Uniform1i(self.program.get_unif("tex_sampler"), 0);
            gl::UniformMatrix4fv(
                self.program.get_unif("projection"),
                1,
                gl::FALSE,
                &projection[0],
            );
            gl::UniformMatrix4fv(
                self.program.get_unif("transform"),
                1,
                gl::FALSE,
                &transform[0],
            );

            // draw the triangles of the occupied slots
            gl::BindVertexArray(self.buffers.vao);
            gl::DrawElements(
                gl::TRIANGLES,
                self.store.draw_index_count() as GLsizei,
                gl::UNSIGNED_INT,
                ptr::null(),
            );
            gl::BindVertexArray(0);
            gl::UseProgram(0);
            gl::Disable(gl::BLEND);
        }
    }

    /// access to the cpu side storage
    #[inline]
    pub fn store(&self) -> &SpriteStore {
        &self.store
    }

    /// the bound texture atlas
    #[inline]
    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    #[inline]
    pub fn sprite_count(&self) -> usize {
        self.store.sprite_count()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }
}

impl Drop for SpriteBatch {
    fn drop(&mut self) {
        log::debug!("dropped sprite batch");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn index_table_pattern() {
        let table = build_index_table(MAX_SPRITES);
        assert_eq!(table.len(), MAX_SPRITES * INDICES_PER_SPRITE);
        for (slot, chunk) in table.chunks(INDICES_PER_SPRITE).enumerate() {
            let b = (slot * 4) as GLuint;
            assert_eq!(chunk, [b, b + 1, b + 2, b + 2, b + 3, b]);
        }
    }

    #[test]
    fn index_table_is_independent_of_sprite_count() {
        let mut store = SpriteStore::with_capacity(8);
        let before = store.indices().to_vec();
        store
            .add(&Sprite::new(glm::vec2(0.0, 0.0), glm::vec2(1.0, 1.0)))
            .unwrap();
        assert_eq!(store.indices(), before.as_slice());
        assert_eq!(before, build_index_table(8));
    }

    #[test]
    fn empty_table() {
        assert!(build_index_table(0).is_empty());
    }

    #[test]
    fn capacity_limit() {
        assert!(capacity_fits(0));
        assert!(capacity_fits(MAX_SPRITES));
        assert!(capacity_fits(MAX_BATCH_CAPACITY));
        assert!(!capacity_fits(MAX_BATCH_CAPACITY + 1));
        // the vertex indices fit long before the draw count does
        assert!(!capacity_fits(1_073_741_823));
        assert!(!capacity_fits(usize::MAX / 2));
        assert!(!capacity_fits(usize::MAX));

        let full_draw = MAX_BATCH_CAPACITY * INDICES_PER_SPRITE;
        assert!(GLsizei::try_from(full_draw).is_ok());
        assert!(((MAX_BATCH_CAPACITY - 1) * VERTICES_PER_SPRITE + 3) <= GLuint::MAX as usize);
    }

    #[test]
    #[should_panic(expected = "sprite capacity exceeds the index range")]
    fn huge_capacity_is_rejected() {
        SpriteStore::with_capacity(usize::MAX / 2);
    }

    #[test]
    #[should_panic(expected = "sprite capacity exceeds the index range")]
    fn capacity_past_draw_count_is_rejected() {
        SpriteStore::with_capacity(1_073_741_823);
    }

    #[test]
    #[should_panic(expected = "sprite capacity exceeds the index range")]
    fn index_table_past_limit_is_rejected() {
        build_index_table(MAX_BATCH_CAPACITY + 1);
    }

    #[test]
    fn projection_maps_viewport_corners() {
        let projection = ortho_projection();
        let top_left = projection * glm::vec4(0.0, 0.0, 0.0, 1.0);
        let bottom_right = projection * glm::vec4(640.0, 480.0, 0.0, 1.0);
        assert_abs_diff_eq!(top_left.x, -1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(top_left.y, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(bottom_right.x, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(bottom_right.y, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn slot_vertices_bounds() {
        let mut store = SpriteStore::with_capacity(2);
        assert!(store.slot_vertices(0).is_none());
        store
            .add(&Sprite::new(glm::vec2(5.0, 5.0), glm::vec2(2.0, 2.0)))
            .unwrap();
        assert_eq!(store.slot_vertices(0).map(<[_]>::len), Some(4));
        assert!(store.slot_vertices(1).is_none());
        assert!(store.slot_vertices(usize::MAX).is_none());
    }
}
