use crate::window::ByteWindow;

#[test]
fn test_append_and_cursor() {
    let mut window = ByteWindow::with_capacity(8);
    assert!(!window.is_readable());
    assert_eq!(window.peek_u8(), None);

    window.append(&[1, 2, 3]);
    window.append(&[4]);
    assert_eq!(window.readable_bytes(), 4);
    assert_eq!(window.writer_index(), 4);
    assert_eq!(window.peek_u8(), Some(1));

    assert_eq!(window.skip_bytes(3), 3);
    assert_eq!(window.unread(), &[4]);
    assert_eq!(window.skip_bytes(5), 1);
    assert!(!window.is_readable());

    window.set_reader_index(1);
    assert_eq!(window.as_ref(), &[2, 3, 4]);
}

#[test]
fn test_discard_read_bytes_keeps_unread() {
    let mut window = ByteWindow::from(&[1u8, 2, 3, 4][..]);
    window.skip_bytes(3);
    window.discard_read_bytes();
    assert_eq!(window.reader_index(), 0);
    assert_eq!(window.writer_index(), 1);
    assert_eq!(window.unread(), &[4]);

    window.skip_bytes(1);
    window.discard_read_bytes();
    assert_eq!(window.writer_index(), 0);

    window.append(&[9]);
    assert_eq!(window.unread(), &[9]);
}

#[test]
#[should_panic(expected = "out of bounds")]
fn test_reader_index_cannot_pass_writer_index() {
    let mut window = ByteWindow::from(&[1u8, 2][..]);
    window.set_reader_index(3);
}
